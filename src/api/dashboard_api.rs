// ==========================================
// 货代单证管理系统 - 驾驶舱 API
// ==========================================
// 职责: 汇总运单/单证目录与活动日志，提供驾驶舱视图
// 提醒规则:
//   - 每个存在待处理单证的运单一条；待处理 >= 阈值为 Urgent，否则 Warning
//   - 每个被驳回的单证一条 Info
//   - 按等级由高到低排列，同级保持目录顺序
// ==========================================

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::api::error::ApiResult;
use crate::config::UiConfig;
use crate::domain::action_log::ActivityEntry;
use crate::domain::types::{AlertLevel, DocumentStatus};
use crate::engine::status_formatter::{StatusBadge, StatusFormatter};
use crate::i18n;
use crate::repository::action_log_repo::ActivityLogRepository;
use crate::repository::document_repo::DocumentDirectory;
use crate::repository::shipment_repo::ShipmentDirectory;

/// KPI 计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardKpis {
    /// 各运单单证总数之和
    pub active_documents: u32,
    /// 未交付运单数
    pub shipments_in_progress: usize,
    /// 各运单待处理单证数之和
    pub pending_documents: u32,
    /// 不同客户数
    pub active_clients: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardAlert {
    pub level: AlertLevel,
    pub message: String,
    pub shipment_id: String,
    pub badge: StatusBadge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub kpis: DashboardKpis,
    pub alerts: Vec<DashboardAlert>,
    pub recent_activity: Vec<ActivityEntry>,
}

pub struct DashboardApi {
    shipments: Arc<dyn ShipmentDirectory>,
    documents: Arc<dyn DocumentDirectory>,
    activity: Arc<ActivityLogRepository>,
    formatter: StatusFormatter,
    recent_limit: usize,
    urgent_threshold: u32,
}

impl DashboardApi {
    pub fn new(
        shipments: Arc<dyn ShipmentDirectory>,
        documents: Arc<dyn DocumentDirectory>,
        activity: Arc<ActivityLogRepository>,
        formatter: StatusFormatter,
        ui: &UiConfig,
    ) -> Self {
        Self {
            shipments,
            documents,
            activity,
            formatter,
            recent_limit: ui.recent_activity_limit,
            urgent_threshold: ui.urgent_pending_threshold,
        }
    }

    /// 驾驶舱汇总
    pub fn summary(&self) -> ApiResult<DashboardSummary> {
        let kpis = self.kpis()?;
        let alerts = self.alerts()?;
        let recent_activity = self.recent_activity(self.recent_limit)?;

        tracing::debug!(
            alerts = alerts.len(),
            activity = recent_activity.len(),
            "驾驶舱汇总完成"
        );

        Ok(DashboardSummary {
            kpis,
            alerts,
            recent_activity,
        })
    }

    pub fn kpis(&self) -> ApiResult<DashboardKpis> {
        let shipments = self.shipments.list_shipments()?;

        let clients: HashSet<&str> = shipments.iter().map(|s| s.client.as_str()).collect();

        Ok(DashboardKpis {
            active_documents: shipments.iter().map(|s| s.documents_total).sum(),
            shipments_in_progress: shipments.iter().filter(|s| s.status.is_in_progress()).count(),
            pending_documents: shipments.iter().map(|s| s.documents_pending).sum(),
            active_clients: clients.len(),
        })
    }

    pub fn alerts(&self) -> ApiResult<Vec<DashboardAlert>> {
        let locale = self.formatter.locale();
        let mut alerts = Vec::new();

        for shipment in self.shipments.list_shipments()? {
            if !shipment.has_pending_documents() {
                continue;
            }
            let level = if shipment.documents_pending >= self.urgent_threshold {
                AlertLevel::Urgent
            } else {
                AlertLevel::Warning
            };
            alerts.push(DashboardAlert {
                level,
                message: i18n::t_in_with_args(
                    locale,
                    "alert.pending_docs",
                    &[("count", &shipment.documents_pending.to_string())],
                ),
                shipment_id: shipment.id,
                badge: self.formatter.alert(level),
            });
        }

        for document in self.documents.list_documents()? {
            if document.status != DocumentStatus::Rejected {
                continue;
            }
            alerts.push(DashboardAlert {
                level: AlertLevel::Info,
                message: i18n::t_in_with_args(locale, "alert.rejected_doc", &[("name", &document.name)]),
                shipment_id: document.shipment_id,
                badge: self.formatter.alert(AlertLevel::Info),
            });
        }

        // sort_by 为稳定排序
        alerts.sort_by(|a, b| b.level.cmp(&a.level));
        Ok(alerts)
    }

    /// 最近活动（新→旧）
    pub fn recent_activity(&self, limit: usize) -> ApiResult<Vec<ActivityEntry>> {
        Ok(self.activity.list_recent(limit)?)
    }
}
