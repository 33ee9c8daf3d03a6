// ==========================================
// 货代单证管理系统 - 内置样例数据
// ==========================================
// 用途: 未配置外部目录文件时的演示/测试数据
// ==========================================

use crate::domain::document::{DocumentComment, DocumentRecord};
use crate::domain::shipment::ShipmentSummary;
use crate::domain::types::{CommentKind, DocumentStatus, LoadType, ShipmentStatus};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// 样例运单
pub fn sample_shipments() -> Vec<ShipmentSummary> {
    vec![
        ShipmentSummary {
            id: "SHP-2024-001".to_string(),
            client: "ACME Corp".to_string(),
            origin: "Barcelona, España".to_string(),
            destination: "Miami, FL".to_string(),
            status: ShipmentStatus::InTransit,
            departure: date(2024, 1, 15),
            estimated_arrival: date(2024, 1, 22),
            documents_total: 8,
            documents_pending: 2,
            load_type: LoadType::Fcl,
            container: Some("MSKU-123456-7".to_string()),
        },
        ShipmentSummary {
            id: "SHP-2024-002".to_string(),
            client: "Global Trade Ltd".to_string(),
            origin: "Valencia, España".to_string(),
            destination: "New York, NY".to_string(),
            status: ShipmentStatus::Documentation,
            departure: date(2024, 1, 18),
            estimated_arrival: date(2024, 1, 25),
            documents_total: 12,
            documents_pending: 0,
            load_type: LoadType::Lcl,
            container: Some("TCLU-789012-3".to_string()),
        },
        ShipmentSummary {
            id: "SHP-2024-003".to_string(),
            client: "Import Express".to_string(),
            origin: "Madrid, España".to_string(),
            destination: "Los Angeles, CA".to_string(),
            status: ShipmentStatus::Preparation,
            departure: date(2024, 1, 20),
            estimated_arrival: date(2024, 1, 28),
            documents_total: 5,
            documents_pending: 3,
            load_type: LoadType::Fcl,
            container: Some("OOLU-345678-9".to_string()),
        },
    ]
}

/// 样例客户单证
pub fn sample_documents() -> Vec<DocumentRecord> {
    let upload_date = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap_or_default();

    vec![
        DocumentRecord {
            id: "DOC-001".to_string(),
            shipment_id: "SHP-2024-001".to_string(),
            name: "Bill of Lading - Container MSKU-123456-7".to_string(),
            doc_type: "Bill of Lading".to_string(),
            upload_date: upload_date(15),
            status: DocumentStatus::Validated,
            size_label: "2.3 MB".to_string(),
            comments: Vec::new(),
            client_can_comment: true,
        },
        DocumentRecord {
            id: "DOC-002".to_string(),
            shipment_id: "SHP-2024-001".to_string(),
            name: "Factura Comercial - ACME Corp".to_string(),
            doc_type: "Factura Comercial".to_string(),
            upload_date: upload_date(16),
            status: DocumentStatus::PendingReview,
            size_label: "1.8 MB".to_string(),
            comments: vec![DocumentComment {
                id: 1,
                author: "Freight Forwarder".to_string(),
                message: "Favor revisar el valor declarado en la línea 3".to_string(),
                created_at: upload_date(16).and_hms_opt(14, 30, 0).unwrap_or_default(),
                kind: CommentKind::Request,
            }],
            client_can_comment: true,
        },
        DocumentRecord {
            id: "DOC-003".to_string(),
            shipment_id: "SHP-2024-001".to_string(),
            name: "Lista de Empaque".to_string(),
            doc_type: "Lista de Empaque".to_string(),
            upload_date: upload_date(16),
            status: DocumentStatus::Validated,
            size_label: "1.2 MB".to_string(),
            comments: Vec::new(),
            client_can_comment: true,
        },
    ]
}
