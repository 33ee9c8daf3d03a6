// ==========================================
// 货代单证管理系统 - 数据仓储层
// ==========================================
// 职责: 运单/单证目录与活动日志的数据访问
// 存储: 内存（无持久化）
// ==========================================

pub mod action_log_repo;
pub mod document_repo;
pub mod error;
pub mod seed;
pub mod shipment_repo;

// 重导出
pub use action_log_repo::ActivityLogRepository;
pub use document_repo::{DocumentDirectory, DocumentRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use shipment_repo::{ShipmentDirectory, ShipmentRepository};
