// ==========================================
// 货代单证管理系统 - 外部协作方接口
// ==========================================
// DocumentSink: 接收上传批次（文件存储）
// CommentSink: 接收客户评论
// 默认实现只写日志，并在内存中保留最近的记录（超出容量丢弃最旧）
// ==========================================

use crate::domain::upload::SubmissionBatch;
use crate::repository::action_log_repo::DEFAULT_CAPACITY;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn submit_batch(&self, batch: &SubmissionBatch) -> anyhow::Result<()>;
}

#[async_trait]
pub trait CommentSink: Send + Sync {
    async fn submit_comment(&self, document_id: &str, message: &str) -> anyhow::Result<()>;
}

// ==========================================
// 默认实现
// ==========================================

/// 追加到有界缓冲
fn push_bounded<T>(buffer: &Mutex<VecDeque<T>>, capacity: usize, item: T) -> anyhow::Result<()> {
    let mut guard = buffer
        .lock()
        .map_err(|e| anyhow::anyhow!("lock poisoned: {}", e))?;
    if guard.len() == capacity {
        guard.pop_front();
    }
    guard.push_back(item);
    Ok(())
}

fn snapshot<T: Clone>(buffer: &Mutex<VecDeque<T>>) -> Vec<T> {
    buffer
        .lock()
        .map(|b| b.iter().cloned().collect())
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct LoggingDocumentSink {
    batches: Mutex<VecDeque<SubmissionBatch>>,
    capacity: usize,
}

impl LoggingDocumentSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// 保留的批次（旧→新）
    pub fn submitted(&self) -> Vec<SubmissionBatch> {
        snapshot(&self.batches)
    }
}

impl Default for LoggingDocumentSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentSink for LoggingDocumentSink {
    async fn submit_batch(&self, batch: &SubmissionBatch) -> anyhow::Result<()> {
        tracing::info!(
            batch_id = %batch.batch_id,
            shipment = %batch.shipment_id,
            files = batch.files.len(),
            priority = ?batch.options.priority,
            "接收上传批次"
        );
        push_bounded(&self.batches, self.capacity, batch.clone())
    }
}

/// 已提交的评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedComment {
    pub document_id: String,
    pub message: String,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug)]
pub struct LoggingCommentSink {
    comments: Mutex<VecDeque<SubmittedComment>>,
    capacity: usize,
}

impl LoggingCommentSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            comments: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn submitted(&self) -> Vec<SubmittedComment> {
        snapshot(&self.comments)
    }
}

impl Default for LoggingCommentSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentSink for LoggingCommentSink {
    async fn submit_comment(&self, document_id: &str, message: &str) -> anyhow::Result<()> {
        tracing::info!(document_id, len = message.len(), "接收客户评论");
        push_bounded(
            &self.comments,
            self.capacity,
            SubmittedComment {
                document_id: document_id.to_string(),
                message: message.to_string(),
                submitted_at: Local::now().naive_local(),
            },
        )
    }
}
