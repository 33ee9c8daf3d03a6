// ==========================================
// 货代单证管理系统 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 运单/单证字段映射 + 类型转换
// 说明: 列名同时接受 snake_case 与前端导出的 camelCase
// ==========================================

use crate::domain::document::DocumentRecord;
use crate::domain::shipment::ShipmentSummary;
use crate::domain::types::{DocumentStatus, LoadType, ShipmentStatus};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use chrono::NaiveDate;

pub struct FieldMapper;

impl FieldMapper {
    /// 行记录 → 运单摘要
    pub fn map_to_shipment(&self, row: &RawRecord, row_number: usize) -> ImportResult<ShipmentSummary> {
        Ok(ShipmentSummary {
            id: self.require(row, "id", row_number)?,
            client: self.require(row, "client", row_number)?,
            origin: self.require(row, "origin", row_number)?,
            destination: self.require(row, "destination", row_number)?,
            status: self
                .get_string(row, "status")
                .map(|s| ShipmentStatus::from_code(&s))
                .unwrap_or_default(),
            departure: self.parse_date(row, "departure", row_number)?,
            estimated_arrival: self.parse_date(row, "estimated_arrival", row_number)?,
            documents_total: self.parse_u32(row, "documents", row_number)?.unwrap_or(0),
            documents_pending: self.parse_u32(row, "pending_docs", row_number)?.unwrap_or(0),
            load_type: self
                .get_string(row, "type")
                .map(|s| LoadType::from_code(&s))
                .unwrap_or(LoadType::Fcl),
            container: self.get_string(row, "container"),
        })
    }

    /// 行记录 → 单证记录（CSV 不携带评论）
    pub fn map_to_document(&self, row: &RawRecord, row_number: usize) -> ImportResult<DocumentRecord> {
        let upload_date = self
            .parse_date(row, "upload_date", row_number)?
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: "upload_date".to_string(),
            })?;

        Ok(DocumentRecord {
            id: self.require(row, "id", row_number)?,
            shipment_id: self.require(row, "shipment_id", row_number)?,
            name: self.require(row, "name", row_number)?,
            doc_type: self.require(row, "type", row_number)?,
            upload_date,
            status: self
                .get_string(row, "status")
                .map(|s| DocumentStatus::from_code(&s))
                .unwrap_or_default(),
            size_label: self.get_string(row, "size").unwrap_or_default(),
            comments: Vec::new(),
            client_can_comment: self
                .get_string(row, "client_can_comment")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
        })
    }

    /// 提取字符串字段，支持多个可能的列名（别名）
    fn get_string(&self, row: &RawRecord, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            "estimated_arrival" => &["estimated_arrival", "estimated", "eta"],
            "pending_docs" => &["pending_docs", "pendingDocs"],
            "documents" => &["documents", "documents_total"],
            "shipment_id" => &["shipment_id", "shipmentId"],
            "upload_date" => &["upload_date", "uploadDate"],
            "client_can_comment" => &["client_can_comment", "clientCanComment"],
            "type" => &["type", "doc_type", "load_type"],
            _ => &[],
        };

        std::iter::once(key)
            .chain(aliases.iter().copied())
            .filter_map(|alias| row.get(alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn require(&self, row: &RawRecord, key: &str, row_number: usize) -> ImportResult<String> {
        self.get_string(row, key).ok_or_else(|| ImportError::MissingField {
            row: row_number,
            field: key.to_string(),
        })
    }

    fn parse_u32(&self, row: &RawRecord, key: &str, row_number: usize) -> ImportResult<Option<u32>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value
                .parse::<u32>()
                .map(Some)
                .map_err(|_| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("no es un entero: {}", value),
                }),
        }
    }

    fn parse_date(&self, row: &RawRecord, key: &str, row_number: usize) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| ImportError::DateFormatError {
                    row: row_number,
                    field: key.to_string(),
                    value,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_shipment_with_camel_case_aliases() {
        let record = row(&[
            ("id", "SHP-2024-009"),
            ("client", "ACME Corp"),
            ("origin", "Bilbao, España"),
            ("destination", "Houston, TX"),
            ("status", "documentacion"),
            ("departure", "2024-02-01"),
            ("estimated", "2024-02-15"),
            ("documents", "6"),
            ("pendingDocs", "1"),
            ("type", "LCL"),
        ]);

        let shipment = FieldMapper.map_to_shipment(&record, 2).unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Documentation);
        assert_eq!(shipment.estimated_arrival, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(shipment.documents_total, 6);
        assert_eq!(shipment.documents_pending, 1);
        assert_eq!(shipment.load_type, LoadType::Lcl);
        assert!(shipment.container.is_none());
    }

    #[test]
    fn test_map_shipment_missing_client() {
        let record = row(&[("id", "SHP-1"), ("origin", "A"), ("destination", "B")]);
        let err = FieldMapper.map_to_shipment(&record, 3).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { row: 3, ref field } if field == "client"));
    }

    #[test]
    fn test_map_document_bad_date() {
        let record = row(&[
            ("id", "DOC-9"),
            ("shipmentId", "SHP-1"),
            ("name", "Factura"),
            ("type", "Factura Comercial"),
            ("uploadDate", "16/01/2024"),
        ]);
        let err = FieldMapper.map_to_document(&record, 4).unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { row: 4, .. }));
    }

    #[test]
    fn test_map_document_defaults() {
        let record = row(&[
            ("id", "DOC-9"),
            ("shipment_id", "SHP-1"),
            ("name", "Factura"),
            ("type", "Factura Comercial"),
            ("upload_date", "2024-01-16"),
            ("status", "unknown"),
            ("client_can_comment", "false"),
        ]);
        let doc = FieldMapper.map_to_document(&record, 2).unwrap();
        assert_eq!(doc.status, DocumentStatus::PendingReview);
        assert!(!doc.client_can_comment);
        assert!(doc.comments.is_empty());
    }
}
