// ==========================================
// 货代单证管理系统 - 活动日志领域模型
// ==========================================
// 用途: 驾驶舱"最近活动"，记录上传提交与评论等操作
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ActivityEntry - 活动记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub activity_id: String,
    pub activity_ts: NaiveDateTime,
    pub action_type: ActionType,
    pub client: Option<String>,
    pub shipment_id: Option<String>,
    pub outcome: ActivityOutcome,
    pub detail: Option<String>,
}

impl ActivityEntry {
    /// 以当前本地时间生成一条活动
    pub fn now(
        action_type: ActionType,
        client: Option<String>,
        shipment_id: Option<String>,
        outcome: ActivityOutcome,
        detail: Option<String>,
    ) -> Self {
        Self {
            activity_id: uuid::Uuid::new_v4().to_string(),
            activity_ts: chrono::Local::now().naive_local(),
            action_type,
            client,
            shipment_id,
            outcome,
            detail,
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    UploadSubmitted,   // 单证批次提交
    CommentAdded,      // 客户评论
    DocumentValidated, // 单证校验通过
    DocumentRejected,  // 单证驳回
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::UploadSubmitted => "UPLOAD_SUBMITTED",
            ActionType::CommentAdded => "COMMENT_ADDED",
            ActionType::DocumentValidated => "DOCUMENT_VALIDATED",
            ActionType::DocumentRejected => "DOCUMENT_REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityOutcome {
    Success,
    Error,
}
