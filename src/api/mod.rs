// ==========================================
// 货代单证管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI / 界面层调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod intake_api;
pub mod portal_api;
pub mod shipment_api;
pub mod sinks;

// 重导出核心类型
pub use dashboard_api::{DashboardAlert, DashboardApi, DashboardKpis, DashboardSummary};
pub use error::{ApiError, ApiResult, Notification, NotificationVariant};
pub use intake_api::{IntakeApi, SubmissionReceipt};
pub use portal_api::{DocumentView, PortalApi};
pub use shipment_api::{ShipmentApi, ShipmentView};
pub use sinks::{
    CommentSink, DocumentSink, LoggingCommentSink, LoggingDocumentSink, SubmittedComment,
};
