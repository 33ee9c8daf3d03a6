// ==========================================
// 货代单证管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod document;
pub mod shipment;
pub mod types;
pub mod upload;

// 重导出核心类型
pub use action_log::{ActionType, ActivityEntry, ActivityOutcome};
pub use document::{DocumentComment, DocumentRecord};
pub use shipment::ShipmentSummary;
pub use types::{
    AlertLevel, CommentKind, DocumentStatus, LoadType, ShipmentStatus, UploadPriority,
    UploadStatus,
};
pub use upload::{
    FileId, FileSource, OcrPayload, PreviewHandle, SubmissionBatch, SubmissionOptions,
    UploadedFile,
};
