// ==========================================
// 货代单证管理系统 - 核心库
// ==========================================
// 系统定位: 货代单证看板的无界面核心
//   - 运单列表检索
//   - 单证上传与模拟 OCR 分类
//   - 客户门户评论
// 技术栈: Rust + tokio（无持久化，数据为样例或导入文件）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 目录与活动日志
pub mod repository;

// 引擎层 - 上传流水线 / 检索 / 状态展示
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertLevel, CommentKind, DocumentStatus, LoadType, ShipmentStatus, UploadPriority,
    UploadStatus,
};

// 领域实体
pub use domain::{
    ActivityEntry, DocumentComment, DocumentRecord, FileSource, ShipmentSummary,
    SubmissionBatch, SubmissionOptions, UploadedFile,
};

// 引擎
pub use engine::{DocumentClassifier, IntakeSession, KeywordClassifier, StatusFormatter};

// API
pub use api::{ApiError, ApiResult, DashboardApi, IntakeApi, PortalApi, ShipmentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Gestión Documental de Carga";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
