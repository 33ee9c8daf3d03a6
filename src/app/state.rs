// ==========================================
// 货代单证管理系统 - 应用状态
// ==========================================
// 职责: 按配置组装目录、分类器、外部协作方与各 API 实例
// 数据源: data.*_path 配置时从文件导入，否则使用内置样例数据
// ==========================================

use std::sync::Arc;

use crate::api::{
    ApiResult, DashboardApi, IntakeApi, LoggingCommentSink, LoggingDocumentSink, PortalApi,
    ShipmentApi,
};
use crate::config::ConfigManager;
use crate::engine::{
    BroadcastEventPublisher, IntakeEventPublisher, IntakeSession, KeywordClassifier,
    StatusFormatter,
};
use crate::repository::{
    ActivityLogRepository, DocumentDirectory, DocumentRepository, ShipmentDirectory,
    ShipmentRepository,
};

/// 流水线事件广播容量
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// 应用状态
///
/// 持有所有 API 实例和共享资源
pub struct AppState {
    pub config: ConfigManager,

    pub intake_api: Arc<IntakeApi>,
    pub shipment_api: Arc<ShipmentApi>,
    pub portal_api: Arc<PortalApi>,
    pub dashboard_api: Arc<DashboardApi>,

    /// 默认批次接收方（内存记录）
    pub document_sink: Arc<LoggingDocumentSink>,
    /// 默认评论接收方（内存记录）
    pub comment_sink: Arc<LoggingCommentSink>,
    pub activity_repo: Arc<ActivityLogRepository>,
    /// 流水线事件（可订阅）
    pub events: Arc<BroadcastEventPublisher>,
}

impl AppState {
    /// 按配置组装应用状态
    ///
    /// # 说明
    /// 1. 初始化目录（文件导入或样例数据）
    /// 2. 初始化分类器与上传会话
    /// 3. 创建所有 API 实例
    pub fn new(config: ConfigManager) -> ApiResult<Self> {
        tracing::info!(
            source = ?config.source(),
            locale = %config.ui().locale,
            "初始化AppState"
        );

        // ==========================================
        // 目录
        // ==========================================
        let shipment_repo = match &config.data().shipments_path {
            Some(path) => {
                tracing::info!("从文件加载运单目录: {}", path.display());
                ShipmentRepository::from_file(path)?
            }
            None => ShipmentRepository::with_samples(),
        };
        let document_repo = match &config.data().documents_path {
            Some(path) => {
                tracing::info!("从文件加载单证目录: {}", path.display());
                DocumentRepository::from_file(path)?
            }
            None => DocumentRepository::with_samples(),
        };
        let shipments: Arc<dyn ShipmentDirectory> = Arc::new(shipment_repo);
        let documents: Arc<dyn DocumentDirectory> = Arc::new(document_repo);
        let activity_repo = Arc::new(ActivityLogRepository::default());

        // ==========================================
        // 流水线
        // ==========================================
        let classifier = Arc::new(KeywordClassifier::from_config(
            config.classification(),
            config.intake(),
        ));
        let events = Arc::new(BroadcastEventPublisher::new(EVENT_CHANNEL_CAPACITY));
        let publisher: Arc<dyn IntakeEventPublisher> = events.clone();
        let session = IntakeSession::from_config(config.intake(), classifier, Some(publisher));

        // ==========================================
        // API
        // ==========================================
        let locale = config.ui().locale.clone();
        let formatter = StatusFormatter::new(&locale);
        let document_sink = Arc::new(LoggingDocumentSink::new());
        let comment_sink = Arc::new(LoggingCommentSink::new());

        let intake_api = Arc::new(IntakeApi::new(
            session,
            shipments.clone(),
            document_sink.clone(),
            activity_repo.clone(),
            &locale,
        ));
        let shipment_api = Arc::new(ShipmentApi::new(
            shipments.clone(),
            documents.clone(),
            formatter.clone(),
        ));
        let portal_api = Arc::new(PortalApi::new(
            documents.clone(),
            shipments.clone(),
            comment_sink.clone(),
            activity_repo.clone(),
            formatter.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            shipments,
            documents,
            activity_repo.clone(),
            formatter,
            config.ui(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            config,
            intake_api,
            shipment_api,
            portal_api,
            dashboard_api,
            document_sink,
            comment_sink,
            activity_repo,
            events,
        })
    }

    /// 默认配置 + 样例数据
    pub fn with_defaults() -> ApiResult<Self> {
        Self::new(ConfigManager::with_defaults())
    }
}
