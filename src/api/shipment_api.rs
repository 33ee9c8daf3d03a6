// ==========================================
// 货代单证管理系统 - 运单 API
// ==========================================
// 职责: 运单列表检索与状态徽标
// ==========================================

use std::sync::Arc;

use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::document::DocumentRecord;
use crate::domain::shipment::ShipmentSummary;
use crate::domain::types::ShipmentStatus;
use crate::engine::search::{filter_shipments, ShipmentQuery, StatusFilter};
use crate::engine::status_formatter::{StatusBadge, StatusFormatter};
use crate::repository::document_repo::DocumentDirectory;
use crate::repository::shipment_repo::ShipmentDirectory;

/// 列表行：运单 + 状态徽标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentView {
    #[serde(flatten)]
    pub shipment: ShipmentSummary,
    pub route: String,
    pub badge: StatusBadge,
}

pub struct ShipmentApi {
    shipments: Arc<dyn ShipmentDirectory>,
    documents: Arc<dyn DocumentDirectory>,
    formatter: StatusFormatter,
}

impl ShipmentApi {
    pub fn new(
        shipments: Arc<dyn ShipmentDirectory>,
        documents: Arc<dyn DocumentDirectory>,
        formatter: StatusFormatter,
    ) -> Self {
        Self {
            shipments,
            documents,
            formatter,
        }
    }

    /// 按查询条件检索（保持目录顺序）
    pub fn list_shipments(&self, query: &ShipmentQuery) -> ApiResult<Vec<ShipmentView>> {
        let all = self.shipments.list_shipments()?;
        let views: Vec<ShipmentView> = filter_shipments(&all, query)
            .into_iter()
            .map(|s| self.view(s.clone()))
            .collect();

        tracing::debug!(term = %query.term, matched = views.len(), total = all.len(), "运单检索");
        Ok(views)
    }

    /// 按关键词 + 状态码检索（"all" 表示全部）
    pub fn search(&self, term: &str, status_code: &str) -> ApiResult<Vec<ShipmentView>> {
        let query = ShipmentQuery::new(
            term,
            StatusFilter::<ShipmentStatus>::from_shipment_code(status_code),
        );
        self.list_shipments(&query)
    }

    pub fn get_shipment(&self, id: &str) -> ApiResult<ShipmentView> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("ID de envío vacío".to_string()));
        }
        self.shipments
            .find_shipment(id.trim())?
            .map(|s| self.view(s))
            .ok_or_else(|| ApiError::NotFound(format!("Envío {}", id)))
    }

    /// 运单下的单证
    pub fn documents_for(&self, shipment_id: &str) -> ApiResult<Vec<DocumentRecord>> {
        let shipment = self.get_shipment(shipment_id)?;
        Ok(self.documents.list_by_shipment(&shipment.shipment.id)?)
    }

    fn view(&self, shipment: ShipmentSummary) -> ShipmentView {
        ShipmentView {
            route: shipment.route_label(),
            badge: self.formatter.shipment(shipment.status),
            shipment,
        }
    }
}
