// ==========================================
// 货代单证管理系统 - 应用层
// ==========================================
// 职责: 组装各层，供 CLI 使用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
