// ==========================================
// 货代单证管理系统 - 单证上传 API
// ==========================================
// 职责: 封装上传会话，校验运单关联，提交批次到 DocumentSink
// 流程: add_files -> (后台流水线) -> select_shipment -> submit
// 提交成功: 移出已提交文件 + 记录活动 + 返回成功提示
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use tracing::instrument;

use crate::api::error::{ApiError, ApiResult, Notification};
use crate::api::sinks::DocumentSink;
use crate::domain::action_log::{ActionType, ActivityEntry, ActivityOutcome};
use crate::domain::shipment::ShipmentSummary;
use crate::domain::upload::{FileSource, SubmissionOptions, UploadedFile};
use crate::engine::error::IntakeError;
use crate::engine::intake::IntakeSession;
use crate::engine::intake_state::IntakeState;
use crate::i18n;
use crate::repository::action_log_repo::ActivityLogRepository;
use crate::repository::shipment_repo::ShipmentDirectory;
use serde::{Deserialize, Serialize};

/// 提交回执
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub batch_id: String,
    pub shipment_id: String,
    pub file_count: usize,
    pub notification: Notification,
}

pub struct IntakeApi {
    session: IntakeSession,
    shipments: Arc<dyn ShipmentDirectory>,
    sink: Arc<dyn DocumentSink>,
    activity: Arc<ActivityLogRepository>,
    locale: &'static str,
}

impl IntakeApi {
    pub fn new(
        session: IntakeSession,
        shipments: Arc<dyn ShipmentDirectory>,
        sink: Arc<dyn DocumentSink>,
        activity: Arc<ActivityLogRepository>,
        locale: &str,
    ) -> Self {
        Self {
            session,
            shipments,
            sink,
            activity,
            locale: i18n::normalize_locale(locale),
        }
    }

    pub fn session(&self) -> &IntakeSession {
        &self.session
    }

    // ==========================================
    // 文件
    // ==========================================

    pub fn add_files(&self, sources: Vec<FileSource>) -> ApiResult<Vec<UploadedFile>> {
        Ok(self.session.add_files(sources)?)
    }

    /// 按本地路径加入文件（读取文件名与大小）
    pub fn add_paths(&self, paths: &[PathBuf]) -> ApiResult<Vec<UploadedFile>> {
        let sources = paths
            .iter()
            .map(|p| {
                FileSource::from_path(p).map_err(|e| {
                    ApiError::InvalidInput(i18n::t_in_with_args(
                        self.locale,
                        "import.file_not_found",
                        &[("path", &format!("{} ({})", p.display(), e))],
                    ))
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;
        self.add_files(sources)
    }

    pub fn remove_file(&self, file_id: &str) -> ApiResult<UploadedFile> {
        Ok(self.session.remove_file(file_id)?)
    }

    pub fn files(&self) -> ApiResult<Vec<UploadedFile>> {
        Ok(self.session.files()?)
    }

    pub fn snapshot(&self) -> ApiResult<IntakeState> {
        Ok(self.session.snapshot()?)
    }

    /// 等待所有文件走完流水线
    pub async fn settle(&self) {
        self.session.settle().await;
    }

    // ==========================================
    // 运单关联与选项
    // ==========================================

    /// 运单下拉框数据
    pub fn available_shipments(&self) -> ApiResult<Vec<ShipmentSummary>> {
        Ok(self.shipments.list_shipments()?)
    }

    /// 选择关联运单；空值清除关联
    ///
    /// # 返回
    /// - Ok(Some(shipment)): 已关联
    /// - Ok(None): 已清除
    /// - Err(NotFound): 运单不存在
    pub fn select_shipment(&self, shipment_id: Option<&str>) -> ApiResult<Option<ShipmentSummary>> {
        let id = shipment_id.map(str::trim).filter(|s| !s.is_empty());
        let Some(id) = id else {
            self.session.select_shipment(None)?;
            return Ok(None);
        };

        let shipment = self
            .shipments
            .find_shipment(id)?
            .ok_or_else(|| IntakeError::UnknownShipment(id.to_string()))?;

        self.session.select_shipment(Some(shipment.id.clone()))?;
        tracing::debug!(shipment = %shipment.id, "已关联运单");
        Ok(Some(shipment))
    }

    pub fn set_options(&self, options: SubmissionOptions) -> ApiResult<()> {
        Ok(self.session.set_options(options)?)
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 提交当前批次
    ///
    /// # 返回
    /// - Err(EmptyBatch / MissingShipment): 校验失败，会话不变
    /// - Err(ExternalServiceError): 外部存储拒收，会话不变，记录失败活动
    #[instrument(skip(self))]
    pub async fn submit(&self) -> ApiResult<SubmissionReceipt> {
        let batch = match self.session.prepare_submission() {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!("提交校验失败: {}", e);
                return Err(e.into());
            }
        };

        let client = self
            .shipments
            .find_shipment(&batch.shipment_id)?
            .map(|s| s.client);

        if let Err(e) = self.sink.submit_batch(&batch).await {
            tracing::warn!(batch_id = %batch.batch_id, "批次提交失败: {}", e);
            self.record(
                &batch.shipment_id,
                client,
                ActivityOutcome::Error,
                e.to_string(),
            );
            return Err(IntakeError::Sink(e.to_string()).into());
        }

        self.session.complete_submission(&batch)?;

        let count = batch.files.len();
        self.record(
            &batch.shipment_id,
            client,
            ActivityOutcome::Success,
            i18n::t_in_with_args(
                self.locale,
                "activity.upload_detail",
                &[("count", &count.to_string())],
            ),
        );

        let description = i18n::t_in_with_args(
            self.locale,
            "notify.uploaded",
            &[("count", &count.to_string())],
        );

        Ok(SubmissionReceipt {
            batch_id: batch.batch_id,
            shipment_id: batch.shipment_id,
            file_count: count,
            notification: Notification::success(self.locale, description),
        })
    }

    fn record(&self, shipment_id: &str, client: Option<String>, outcome: ActivityOutcome, detail: String) {
        let entry = ActivityEntry::now(
            ActionType::UploadSubmitted,
            client,
            Some(shipment_id.to_string()),
            outcome,
            Some(detail),
        );
        // 活动日志写入失败不影响提交结果
        if let Err(e) = self.activity.insert(entry) {
            tracing::warn!("记录活动失败: {}", e);
        }
    }
}
