// ==========================================
// 货代单证管理系统 - 客户单证领域模型
// ==========================================
// 用途: 客户门户展示的单证及其评论
// 约束: 除评论提交外均为只读
// ==========================================

use crate::domain::types::{CommentKind, DocumentStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// DocumentComment - 单证评论
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentComment {
    pub id: u64,
    pub author: String,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub kind: CommentKind,
}

// ==========================================
// DocumentRecord - 单证记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    // ===== 主键 =====
    pub id: String,          // 单证号 (如 DOC-001)
    pub shipment_id: String, // 所属运单

    // ===== 基础信息 =====
    pub name: String,
    pub doc_type: String, // 单证类型 (Bill of Lading / Factura Comercial ...)
    pub upload_date: NaiveDate,
    pub status: DocumentStatus,
    pub size_label: String, // 展示用大小 ("2.3 MB")

    // ===== 评论 =====
    #[serde(default)]
    pub comments: Vec<DocumentComment>, // 按时间顺序
    #[serde(default = "default_true")]
    pub client_can_comment: bool,
}

fn default_true() -> bool {
    true
}

impl DocumentRecord {
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// 是否存在货代发起的待答复请求
    pub fn has_open_request(&self) -> bool {
        self.comments
            .last()
            .map(|c| c.kind == CommentKind::Request)
            .unwrap_or(false)
    }
}
