// ==========================================
// 货代单证管理系统 - 上传流水线事件发布
// ==========================================
// 职责: 定义流水线事件发布 trait，供界面层/审计订阅
// 说明: 引擎层定义 trait，上层按需注入实现
// ==========================================

use crate::domain::types::UploadStatus;
use crate::domain::upload::FileId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::broadcast;

// ==========================================
// 流水线事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeEventType {
    /// 文件加入会话（Uploading）
    FileAdded,
    /// 文件未通过格式/大小校验（Error）
    FileRejected,
    /// 上传阶段结束（Processing）
    UploadFinished,
    /// 识别完成（Completed）
    ProcessingFinished,
    /// 识别失败（Error）
    ProcessingFailed,
    /// 用户移除文件
    FileRemoved,
    /// 批次提交成功
    BatchSubmitted,
}

impl IntakeEventType {
    pub fn as_str(&self) -> &str {
        match self {
            IntakeEventType::FileAdded => "FileAdded",
            IntakeEventType::FileRejected => "FileRejected",
            IntakeEventType::UploadFinished => "UploadFinished",
            IntakeEventType::ProcessingFinished => "ProcessingFinished",
            IntakeEventType::ProcessingFailed => "ProcessingFailed",
            IntakeEventType::FileRemoved => "FileRemoved",
            IntakeEventType::BatchSubmitted => "BatchSubmitted",
        }
    }
}

/// 流水线事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeEvent {
    pub session_id: String,
    /// 批次级事件为 None
    pub file_id: Option<FileId>,
    pub event_type: IntakeEventType,
    /// 事件发生后文件所处状态
    pub status: Option<UploadStatus>,
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl IntakeEvent {
    /// 单文件事件
    pub fn for_file(
        session_id: &str,
        file_id: &str,
        event_type: IntakeEventType,
        status: Option<UploadStatus>,
        detail: Option<String>,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            file_id: Some(file_id.to_string()),
            event_type,
            status,
            detail,
            occurred_at: Utc::now(),
        }
    }

    /// 批次事件
    pub fn for_batch(session_id: &str, event_type: IntakeEventType, detail: Option<String>) -> Self {
        Self {
            session_id: session_id.to_string(),
            file_id: None,
            event_type,
            status: None,
            detail,
            occurred_at: Utc::now(),
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 流水线事件发布者
pub trait IntakeEventPublisher: Send + Sync {
    fn publish(&self, event: IntakeEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl IntakeEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: IntakeEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::trace!(
            "NoOpEventPublisher: 跳过事件 - session={}, event_type={}",
            event.session_id,
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// 广播事件发布者（tokio broadcast，多订阅者）
#[derive(Debug, Clone)]
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<IntakeEvent>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IntakeEvent> {
        self.sender.subscribe()
    }
}

impl IntakeEventPublisher for BroadcastEventPublisher {
    fn publish(&self, event: IntakeEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        // 无订阅者时 send 返回 Err，视为正常
        if self.sender.send(event).is_err() {
            tracing::trace!("BroadcastEventPublisher: 无订阅者");
        }
        Ok(())
    }
}

/// 可选的事件发布者包装
#[derive(Clone)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn IntakeEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn IntakeEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件；失败只记录日志，不影响流水线
    pub fn publish(&self, event: IntakeEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };
        let event_type = event.event_type;
        if let Err(e) = publisher.publish(event) {
            tracing::warn!("事件发布失败: event_type={}, error={}", event_type.as_str(), e);
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
