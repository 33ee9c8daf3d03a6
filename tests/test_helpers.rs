// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 构造上传会话/API、样例文件与临时数据文件
// ==========================================

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use freight_docs::api::{DocumentSink, IntakeApi, LoggingDocumentSink};
use freight_docs::config::IntakeConfig;
use freight_docs::domain::{FileSource, SubmissionBatch};
use freight_docs::engine::{
    Classification, ConfidenceSampler, DocumentClassifier, FileConstraints, IntakeError,
    IntakeSession, IntakeTimings, KeywordClassifier, OptionalEventPublisher,
};
use freight_docs::repository::{ActivityLogRepository, ShipmentRepository};
use tempfile::NamedTempFile;

pub const UPLOAD_DELAY: Duration = Duration::from_millis(1000);
pub const PROCESSING_DELAY: Duration = Duration::from_millis(2000);

/// 固定种子的关键词分类器
pub fn seeded_classifier() -> Arc<dyn DocumentClassifier> {
    Arc::new(
        KeywordClassifier::with_defaults()
            .with_sampler(ConfidenceSampler::seeded(70.0, 100.0, 2024)),
    )
}

/// 总是失败的分类器
pub struct FailingClassifier;

#[async_trait]
impl DocumentClassifier for FailingClassifier {
    fn name(&self) -> &str {
        "failing"
    }

    async fn classify(&self, _file: &FileSource) -> Result<Classification, IntakeError> {
        Err(IntakeError::Classification(
            "servicio OCR no disponible".to_string(),
        ))
    }
}

pub fn session_with(
    classifier: Arc<dyn DocumentClassifier>,
    constraints: FileConstraints,
    events: OptionalEventPublisher,
) -> IntakeSession {
    IntakeSession::with_events(classifier, constraints, IntakeTimings::default(), events)
}

pub fn default_session() -> IntakeSession {
    session_with(
        seeded_classifier(),
        FileConstraints::default(),
        OptionalEventPublisher::none(),
    )
}

/// 上传 API 及其协作方
pub struct IntakeFixture {
    pub api: IntakeApi,
    pub sink: Arc<LoggingDocumentSink>,
    pub activity: Arc<ActivityLogRepository>,
}

/// 以任意 DocumentSink 构造上传 API
pub fn intake_api_with_sink(
    session: IntakeSession,
    sink: Arc<dyn DocumentSink>,
) -> (IntakeApi, Arc<ActivityLogRepository>) {
    let activity = Arc::new(ActivityLogRepository::default());
    let api = IntakeApi::new(
        session,
        Arc::new(ShipmentRepository::with_samples()),
        sink,
        activity.clone(),
        "es",
    );
    (api, activity)
}

pub fn intake_fixture_with(session: IntakeSession) -> IntakeFixture {
    let sink = Arc::new(LoggingDocumentSink::new());
    let (api, activity) = intake_api_with_sink(session, sink.clone());
    IntakeFixture {
        api,
        sink,
        activity,
    }
}

pub fn intake_fixture() -> IntakeFixture {
    intake_fixture_with(default_session())
}

/// 延时接收的存储（模拟慢速外部服务）
pub struct SlowSink {
    pub delay: Duration,
    pub inner: LoggingDocumentSink,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: LoggingDocumentSink::new(),
        }
    }
}

#[async_trait]
impl DocumentSink for SlowSink {
    async fn submit_batch(&self, batch: &SubmissionBatch) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.submit_batch(batch).await
    }
}

/// 总是拒收的存储
pub struct RejectingSink;

#[async_trait]
impl DocumentSink for RejectingSink {
    async fn submit_batch(&self, _batch: &SubmissionBatch) -> anyhow::Result<()> {
        anyhow::bail!("almacenamiento no disponible")
    }
}

pub fn pdf(name: &str) -> FileSource {
    FileSource::new(name, 256 * 1024)
}

/// 宽松约束（不校验格式/大小）
pub fn permissive_config() -> IntakeConfig {
    IntakeConfig {
        enforce_file_constraints: false,
        ..IntakeConfig::default()
    }
}

/// 写入临时文件（保持返回值存活）
pub fn write_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
