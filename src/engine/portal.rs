// ==========================================
// 货代单证管理系统 - 客户门户状态
// ==========================================
// 职责: 客户门户的检索词 / 展开单证 / 评论草稿
// 红线: 评论校验失败时状态不变
// ==========================================

use crate::engine::error::PortalError;
use crate::engine::search::{DocumentQuery, StatusFilter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalState {
    pub search_term: String,
    /// 当前展开的单证
    pub expanded_doc: Option<String>,
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalAction {
    SearchChanged(String),
    /// 再次点击同一单证时收起
    ToggleDocument(String),
    DraftChanged(String),
    Cancel,
    CommentSent,
}

impl PortalState {
    pub fn query(&self) -> DocumentQuery {
        DocumentQuery::new(self.search_term.clone(), StatusFilter::All)
    }

    pub fn is_expanded(&self, document_id: &str) -> bool {
        self.expanded_doc.as_deref() == Some(document_id)
    }
}

pub fn reduce_portal(mut state: PortalState, action: PortalAction) -> PortalState {
    match action {
        PortalAction::SearchChanged(term) => state.search_term = term,
        PortalAction::ToggleDocument(id) => {
            state.expanded_doc = if state.is_expanded(&id) { None } else { Some(id) };
        }
        PortalAction::DraftChanged(draft) => state.draft = draft,
        PortalAction::Cancel | PortalAction::CommentSent => {
            state.draft.clear();
            state.expanded_doc = None;
        }
    }
    state
}

/// 校验评论内容，返回去除首尾空白后的文本
pub fn validate_comment(message: &str) -> Result<String, PortalError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(PortalError::EmptyComment);
    }
    Ok(trimmed.to_string())
}
