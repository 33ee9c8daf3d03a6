// ==========================================
// 货代单证管理系统 - 引擎层
// ==========================================
// 职责: 上传流水线、检索、状态展示、客户门户状态
// 红线: 引擎不直接访问目录数据源，状态转换走归约函数
// ==========================================

pub mod classifier;
pub mod error;
pub mod events;
pub mod file_rules;
pub mod intake;
pub mod intake_state;
pub mod portal;
pub mod search;
pub mod status_formatter;

pub use classifier::{
    Classification, ConfidenceSampler, DocumentClassifier, KeywordClassifier, KeywordRule,
};
pub use error::{IntakeError, IntakeResult, PortalError};
pub use events::{
    BroadcastEventPublisher, IntakeEvent, IntakeEventPublisher, IntakeEventType,
    NoOpEventPublisher, OptionalEventPublisher,
};
pub use file_rules::FileConstraints;
pub use intake::{IntakeSession, IntakeTimings};
pub use intake_state::{reduce, IntakeAction, IntakeState};
pub use portal::{reduce_portal, validate_comment, PortalAction, PortalState};
pub use search::{filter_documents, filter_shipments, DocumentQuery, ShipmentQuery, StatusFilter};
pub use status_formatter::{StatusBadge, StatusFormatter, StatusIcon};
