// ==========================================
// 货代单证管理系统 - 单证上传流水线
// ==========================================
// 职责: 驱动每个文件独立走完 上传 -> 识别 -> 完成/失败
// 并发模型:
//   - 每个文件一个 tokio 任务，两段延时互不阻塞
//   - 任务按文件 id 登记 CancellationToken，移除/提交时取消
//   - 共享状态仅在一次归约期间持锁，不跨 await
// 红线: 已移除的文件不得被延时任务重新写回
// ==========================================

use crate::config::IntakeConfig;
use crate::domain::types::UploadStatus;
use crate::domain::upload::{FileId, FileSource, SubmissionBatch, SubmissionOptions, UploadedFile};
use crate::engine::classifier::DocumentClassifier;
use crate::engine::error::{IntakeError, IntakeResult};
use crate::engine::events::{
    IntakeEvent, IntakeEventPublisher, IntakeEventType, OptionalEventPublisher,
};
use crate::engine::file_rules::FileConstraints;
use crate::engine::intake_state::{reduce, IntakeAction, IntakeState};
use crate::i18n;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// IntakeTimings - 阶段延时
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeTimings {
    pub upload_delay: Duration,
    pub processing_delay: Duration,
}

impl IntakeTimings {
    pub fn from_config(config: &IntakeConfig) -> Self {
        Self {
            upload_delay: config.upload_delay(),
            processing_delay: config.processing_delay(),
        }
    }
}

impl Default for IntakeTimings {
    fn default() -> Self {
        Self::from_config(&IntakeConfig::default())
    }
}

struct FileTask {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

// 会话内核：由会话句柄与各文件任务共享
struct SessionCore {
    session_id: String,
    state: Mutex<IntakeState>,
    tasks: Mutex<HashMap<FileId, FileTask>>,
    classifier: Arc<dyn DocumentClassifier>,
    events: OptionalEventPublisher,
}

impl SessionCore {
    /// 执行一次归约
    fn dispatch(&self, action: IntakeAction) -> IntakeResult<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| IntakeError::Internal(format!("锁获取失败: {}", e)))?;
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, action);
        Ok(())
    }

    /// 针对单个文件的转换；文件已不在会话中时忽略
    ///
    /// 返回转换后的文件状态（None 表示被忽略）
    fn dispatch_for_file(&self, id: &str, action: IntakeAction) -> IntakeResult<Option<UploadStatus>> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| IntakeError::Internal(format!("锁获取失败: {}", e)))?;
        if !guard.contains(id) {
            return Ok(None);
        }
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, action);
        Ok(guard.find(id).map(|f| f.status))
    }

    fn publish_file_event(
        &self,
        id: &str,
        event_type: IntakeEventType,
        status: Option<UploadStatus>,
        detail: Option<String>,
    ) {
        self.events.publish(IntakeEvent::for_file(
            &self.session_id,
            id,
            event_type,
            status,
            detail,
        ));
    }

    fn forget_task(&self, id: &str) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.remove(id);
        }
    }

    fn cancel_task(&self, id: &str) -> bool {
        match self.tasks.lock() {
            Ok(mut tasks) => match tasks.remove(id) {
                Some(task) => {
                    task.token.cancel();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn cancel_all(&self) -> usize {
        match self.tasks.lock() {
            Ok(mut tasks) => {
                let count = tasks.len();
                for (_, task) in tasks.drain() {
                    task.token.cancel();
                }
                count
            }
            Err(_) => 0,
        }
    }
}

// ==========================================
// IntakeSession - 上传会话
// ==========================================
pub struct IntakeSession {
    core: Arc<SessionCore>,
    constraints: FileConstraints,
    timings: IntakeTimings,
}

impl IntakeSession {
    pub fn new(
        classifier: Arc<dyn DocumentClassifier>,
        constraints: FileConstraints,
        timings: IntakeTimings,
    ) -> Self {
        Self::with_events(classifier, constraints, timings, OptionalEventPublisher::none())
    }

    pub fn with_events(
        classifier: Arc<dyn DocumentClassifier>,
        constraints: FileConstraints,
        timings: IntakeTimings,
        events: OptionalEventPublisher,
    ) -> Self {
        let session_id = Uuid::new_v4().to_string();
        tracing::debug!(%session_id, classifier = classifier.name(), "创建上传会话");

        Self {
            core: Arc::new(SessionCore {
                session_id,
                state: Mutex::new(IntakeState::default()),
                tasks: Mutex::new(HashMap::new()),
                classifier,
                events,
            }),
            constraints,
            timings,
        }
    }

    /// 按配置构造
    pub fn from_config(
        config: &IntakeConfig,
        classifier: Arc<dyn DocumentClassifier>,
        publisher: Option<Arc<dyn IntakeEventPublisher>>,
    ) -> Self {
        let events = match publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p),
            None => OptionalEventPublisher::none(),
        };
        Self::with_events(
            classifier,
            FileConstraints::from_config(config),
            IntakeTimings::from_config(config),
            events,
        )
    }

    pub fn session_id(&self) -> &str {
        &self.core.session_id
    }

    // ==========================================
    // 文件操作
    // ==========================================

    /// 加入一批新选择的文件
    ///
    /// 通过校验的文件立即进入 Uploading 并各自启动延时任务；
    /// 未通过校验的文件直接以 Error 状态加入，不启动任务。
    /// 需在 tokio 运行时内调用。
    #[instrument(skip(self, sources), fields(session = %self.core.session_id, count = sources.len()))]
    pub fn add_files(&self, sources: Vec<FileSource>) -> IntakeResult<Vec<UploadedFile>> {
        let mut accepted = Vec::new();
        let mut added = Vec::with_capacity(sources.len());

        for source in sources {
            let id = Uuid::new_v4().simple().to_string();
            match self.constraints.check(&source) {
                Ok(()) => {
                    let file = UploadedFile::uploading(id, source);
                    accepted.push(file.clone());
                    added.push(file);
                }
                Err(err) => {
                    tracing::warn!(file = %source.name, error = %err, "文件未通过校验");
                    added.push(UploadedFile::rejected(id, source, err.to_string()));
                }
            }
        }

        self.core.dispatch(IntakeAction::FilesAdded(added.clone()))?;

        for file in &added {
            let (event_type, detail) = match file.status {
                UploadStatus::Error => (IntakeEventType::FileRejected, file.error.clone()),
                _ => (IntakeEventType::FileAdded, None),
            };
            self.core
                .publish_file_event(&file.id, event_type, Some(file.status), detail);
        }

        for file in accepted {
            self.schedule(file.id, file.source);
        }

        tracing::info!(
            "文件已加入上传会话: total={}, rejected={}",
            added.len(),
            added.iter().filter(|f| f.status == UploadStatus::Error).count()
        );
        Ok(added)
    }

    /// 为单个文件登记并启动延时任务
    fn schedule(&self, id: FileId, source: FileSource) {
        let token = CancellationToken::new();
        let core = Arc::clone(&self.core);
        let timings = self.timings;

        // 持锁期间 spawn + 登记，保证任务结束时的注销发生在登记之后
        let Ok(mut tasks) = self.core.tasks.lock() else {
            tracing::warn!(file_id = %id, "任务表锁获取失败，文件保持 Uploading");
            return;
        };
        let handle = tokio::spawn(run_file_task(
            core,
            id.clone(),
            source,
            token.clone(),
            timings,
        ));
        tasks.insert(
            id,
            FileTask {
                token,
                handle: Some(handle),
            },
        );
    }

    /// 移除文件，并取消其未触发的延时任务
    pub fn remove_file(&self, id: &str) -> IntakeResult<UploadedFile> {
        let removed = self
            .snapshot()?
            .find(id)
            .cloned()
            .ok_or_else(|| IntakeError::FileNotFound(id.to_string()))?;

        let cancelled = self.core.cancel_task(id);
        self.core.dispatch(IntakeAction::FileRemoved { id: id.to_string() })?;
        self.core
            .publish_file_event(id, IntakeEventType::FileRemoved, None, None);

        tracing::info!(file_id = %id, file = %removed.source.name, cancelled, "文件已移除");
        Ok(removed)
    }

    /// 选择/清除关联运单（存在性由上层校验）
    pub fn select_shipment(&self, shipment_id: Option<String>) -> IntakeResult<()> {
        let shipment_id = shipment_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.core.dispatch(IntakeAction::ShipmentSelected(shipment_id))
    }

    pub fn set_options(&self, options: SubmissionOptions) -> IntakeResult<()> {
        self.core.dispatch(IntakeAction::OptionsChanged(options))
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 校验并生成提交批次（不修改状态）
    ///
    /// # 返回
    /// - Err(EmptyBatch): 没有文件
    /// - Err(MissingShipment): 未选择运单
    pub fn prepare_submission(&self) -> IntakeResult<SubmissionBatch> {
        let state = self.snapshot()?;

        if state.files.is_empty() {
            return Err(IntakeError::EmptyBatch);
        }
        let shipment_id = state.shipment_id.ok_or(IntakeError::MissingShipment)?;

        Ok(SubmissionBatch {
            batch_id: Uuid::new_v4().to_string(),
            shipment_id,
            files: state.files,
            options: state.options,
        })
    }

    /// 整体重置会话：取消所有任务，清空文件与运单关联
    pub fn reset(&self) -> IntakeResult<()> {
        let cancelled = self.core.cancel_all();
        self.core.dispatch(IntakeAction::Cleared)?;
        tracing::debug!(cancelled, "上传会话已重置");
        Ok(())
    }

    /// 批次已被外部存储接收：移出已提交的文件并发布提交事件
    ///
    /// 只取消、移除批次内的文件；提交等待期间新加入的文件与重新选择的运单保留
    pub fn complete_submission(&self, batch: &SubmissionBatch) -> IntakeResult<()> {
        let ids: Vec<FileId> = batch.files.iter().map(|f| f.id.clone()).collect();
        let cancelled = ids.iter().filter(|id| self.core.cancel_task(id)).count();

        self.core.dispatch(IntakeAction::BatchSubmitted {
            ids,
            shipment_id: batch.shipment_id.clone(),
            options: batch.options.clone(),
        })?;

        self.core.events.publish(IntakeEvent::for_batch(
            &self.core.session_id,
            IntakeEventType::BatchSubmitted,
            Some(i18n::t_with_args(
                "intake.batch_submitted",
                &[
                    ("shipment", &batch.shipment_id),
                    ("count", &batch.files.len().to_string()),
                ],
            )),
        ));
        tracing::info!(
            batch_id = %batch.batch_id,
            shipment = %batch.shipment_id,
            cancelled,
            "批次已提交"
        );
        Ok(())
    }

    /// 校验 + 完成提交（不经外部存储）
    pub fn submit(&self) -> IntakeResult<SubmissionBatch> {
        let batch = self.prepare_submission()?;
        self.complete_submission(&batch)?;
        Ok(batch)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 当前状态快照
    pub fn snapshot(&self) -> IntakeResult<IntakeState> {
        self.core
            .state
            .lock()
            .map(|g| g.clone())
            .map_err(|e| IntakeError::Internal(format!("锁获取失败: {}", e)))
    }

    pub fn files(&self) -> IntakeResult<Vec<UploadedFile>> {
        Ok(self.snapshot()?.files)
    }

    /// 尚未结束的延时任务数
    pub fn in_flight(&self) -> usize {
        self.core.tasks.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// 等待当前所有延时任务结束（完成或被取消）
    pub async fn settle(&self) {
        let handles: Vec<JoinHandle<()>> = match self.core.tasks.lock() {
            Ok(mut tasks) => tasks.values_mut().filter_map(|t| t.handle.take()).collect(),
            Err(_) => Vec::new(),
        };

        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::warn!("文件任务异常结束: {}", e);
            }
        }
    }
}

impl Drop for IntakeSession {
    fn drop(&mut self) {
        // 会话结束时不再保留任何延时任务
        self.core.cancel_all();
    }
}

// ==========================================
// 单文件任务
// ==========================================
async fn run_file_task(
    core: Arc<SessionCore>,
    id: FileId,
    source: FileSource,
    token: CancellationToken,
    timings: IntakeTimings,
) {
    // 阶段 1: 上传
    tokio::select! {
        _ = token.cancelled() => {
            tracing::debug!(file_id = %id, "上传阶段被取消");
            return;
        }
        _ = tokio::time::sleep(timings.upload_delay) => {}
    }

    match core.dispatch_for_file(&id, IntakeAction::UploadFinished { id: id.clone() }) {
        Ok(Some(status)) => {
            core.publish_file_event(&id, IntakeEventType::UploadFinished, Some(status), None)
        }
        Ok(None) => {
            tracing::debug!(file_id = %id, "文件已不在会话中，停止处理");
            core.forget_task(&id);
            return;
        }
        Err(e) => {
            tracing::warn!(file_id = %id, error = %e, "上传阶段状态更新失败");
            core.forget_task(&id);
            return;
        }
    }

    // 阶段 2: 识别
    tokio::select! {
        _ = token.cancelled() => {
            tracing::debug!(file_id = %id, "识别阶段被取消");
            return;
        }
        _ = tokio::time::sleep(timings.processing_delay) => {}
    }

    let outcome = tokio::select! {
        _ = token.cancelled() => {
            tracing::debug!(file_id = %id, "分类过程中被取消");
            return;
        }
        result = core.classifier.classify(&source) => result,
    };

    let (action, event_type, detail) = match outcome {
        Ok(classification) => {
            let detail = Some(classification.label.clone());
            (
                IntakeAction::ProcessingFinished {
                    id: id.clone(),
                    classification,
                },
                IntakeEventType::ProcessingFinished,
                detail,
            )
        }
        Err(err) => {
            tracing::warn!(file_id = %id, file = %source.name, error = %err, "识别失败");
            (
                IntakeAction::ProcessingFailed {
                    id: id.clone(),
                    reason: err.to_string(),
                },
                IntakeEventType::ProcessingFailed,
                Some(err.to_string()),
            )
        }
    };

    if token.is_cancelled() {
        return;
    }

    match core.dispatch_for_file(&id, action) {
        Ok(Some(status)) => {
            tracing::debug!(file_id = %id, %status, "文件处理结束");
            core.publish_file_event(&id, event_type, Some(status), detail);
        }
        Ok(None) => tracing::debug!(file_id = %id, "文件已不在会话中，丢弃识别结果"),
        Err(e) => tracing::warn!(file_id = %id, error = %e, "识别结果写入失败"),
    }

    core.forget_task(&id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifier::{ConfidenceSampler, KeywordClassifier};

    fn session() -> IntakeSession {
        let classifier = KeywordClassifier::with_defaults()
            .with_sampler(ConfidenceSampler::seeded(70.0, 100.0, 11));
        IntakeSession::new(
            Arc::new(classifier),
            FileConstraints::default(),
            IntakeTimings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_file_walks_all_stages() {
        let session = session();
        let added = session
            .add_files(vec![FileSource::new("invoice_ACME.pdf", 2048)])
            .unwrap();
        let id = added[0].id.clone();
        assert_eq!(added[0].status, UploadStatus::Uploading);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let state = session.snapshot().unwrap();
        assert_eq!(state.find(&id).unwrap().status, UploadStatus::Processing);
        assert!(state.find(&id).unwrap().classification.is_none());

        session.settle().await;
        let file = session.snapshot().unwrap().find(&id).cloned().unwrap();
        assert_eq!(file.status, UploadStatus::Completed);
        assert_eq!(file.classification.as_deref(), Some("Factura Comercial"));
        assert_eq!(session.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_file_schedules_nothing() {
        let session = session();
        let added = session
            .add_files(vec![FileSource::new("notes.docx", 10)])
            .unwrap();
        assert_eq!(added[0].status, UploadStatus::Error);
        assert!(added[0].error.is_some());
        assert_eq!(session.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_unknown_file() {
        let session = session();
        assert_eq!(
            session.remove_file("missing").unwrap_err(),
            IntakeError::FileNotFound("missing".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_submission_keeps_files_added_later() {
        let session = session();
        session.add_files(vec![FileSource::new("invoice.pdf", 1024)]).unwrap();
        session.select_shipment(Some("SHP-2024-001".to_string())).unwrap();
        let batch = session.prepare_submission().unwrap();

        let late = session
            .add_files(vec![FileSource::new("packing.pdf", 1024)])
            .unwrap();
        session.complete_submission(&batch).unwrap();

        let state = session.snapshot().unwrap();
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].id, late[0].id);
        assert_eq!(state.shipment_id, None);
        assert_eq!(session.in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_everything() {
        let session = session();
        session
            .add_files(vec![
                FileSource::new("a.pdf", 1024),
                FileSource::new("b.pdf", 1024),
            ])
            .unwrap();
        session.reset().unwrap();

        assert_eq!(session.in_flight(), 0);
        assert_eq!(session.snapshot().unwrap(), IntakeState::default());
    }
}
