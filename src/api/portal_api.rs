// ==========================================
// 货代单证管理系统 - 客户门户 API
// ==========================================
// 职责: 客户查看单证、展开详情、提交评论
// 红线: 评论校验失败时门户状态不变
// ==========================================

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult, Notification};
use crate::api::sinks::CommentSink;
use crate::domain::action_log::{ActionType, ActivityEntry, ActivityOutcome};
use crate::domain::document::DocumentRecord;
use crate::engine::error::PortalError;
use crate::engine::portal::{reduce_portal, validate_comment, PortalAction, PortalState};
use crate::engine::search::filter_documents;
use crate::engine::status_formatter::{StatusBadge, StatusFormatter};
use crate::repository::action_log_repo::ActivityLogRepository;
use crate::repository::document_repo::DocumentDirectory;
use crate::repository::shipment_repo::ShipmentDirectory;

/// 门户单证行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub document: DocumentRecord,
    pub badge: StatusBadge,
    pub expanded: bool,
}

pub struct PortalApi {
    documents: Arc<dyn DocumentDirectory>,
    shipments: Arc<dyn ShipmentDirectory>,
    sink: Arc<dyn CommentSink>,
    activity: Arc<ActivityLogRepository>,
    formatter: StatusFormatter,
    state: Mutex<PortalState>,
}

impl PortalApi {
    pub fn new(
        documents: Arc<dyn DocumentDirectory>,
        shipments: Arc<dyn ShipmentDirectory>,
        sink: Arc<dyn CommentSink>,
        activity: Arc<ActivityLogRepository>,
        formatter: StatusFormatter,
    ) -> Self {
        Self {
            documents,
            shipments,
            sink,
            activity,
            formatter,
            state: Mutex::new(PortalState::default()),
        }
    }

    // ==========================================
    // 状态
    // ==========================================

    pub fn state(&self) -> ApiResult<PortalState> {
        self.state
            .lock()
            .map(|g| g.clone())
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))
    }

    pub fn dispatch(&self, action: PortalAction) -> ApiResult<PortalState> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;
        let next = reduce_portal(std::mem::take(&mut *guard), action);
        *guard = next.clone();
        Ok(next)
    }

    pub fn search(&self, term: &str) -> ApiResult<Vec<DocumentView>> {
        self.dispatch(PortalAction::SearchChanged(term.to_string()))?;
        self.visible_documents()
    }

    pub fn toggle_document(&self, document_id: &str) -> ApiResult<PortalState> {
        self.dispatch(PortalAction::ToggleDocument(document_id.to_string()))
    }

    pub fn edit_draft(&self, draft: &str) -> ApiResult<PortalState> {
        self.dispatch(PortalAction::DraftChanged(draft.to_string()))
    }

    pub fn cancel(&self) -> ApiResult<PortalState> {
        self.dispatch(PortalAction::Cancel)
    }

    /// 按当前检索词过滤后的单证
    pub fn visible_documents(&self) -> ApiResult<Vec<DocumentView>> {
        let state = self.state()?;
        let all = self.documents.list_documents()?;
        Ok(filter_documents(&all, &state.query())
            .into_iter()
            .map(|d| DocumentView {
                badge: self.formatter.document(d.status),
                expanded: state.is_expanded(&d.id),
                document: d.clone(),
            })
            .collect())
    }

    // ==========================================
    // 评论
    // ==========================================

    /// 提交评论
    ///
    /// # 返回
    /// - Err(EmptyComment): 空白内容
    /// - Err(NotFound): 单证不存在
    /// - Err(BusinessRuleViolation): 单证不允许客户评论
    #[instrument(skip(self, message), fields(len = message.len()))]
    pub async fn submit_comment(&self, document_id: &str, message: &str) -> ApiResult<Notification> {
        let message = validate_comment(message)?;

        let document = self
            .documents
            .find_document(document_id)?
            .ok_or_else(|| PortalError::DocumentNotFound(document_id.to_string()))?;

        if !document.client_can_comment {
            return Err(PortalError::CommentsDisabled(document.id).into());
        }

        let client = self
            .shipments
            .find_shipment(&document.shipment_id)?
            .map(|s| s.client);

        if let Err(e) = self.sink.submit_comment(&document.id, &message).await {
            tracing::warn!(document_id = %document.id, "评论提交失败: {}", e);
            self.record(&document, client, ActivityOutcome::Error, e.to_string());
            return Err(PortalError::Sink(e.to_string()).into());
        }

        self.record(&document, client, ActivityOutcome::Success, document.name.clone());
        self.dispatch(PortalAction::CommentSent)?;

        tracing::info!(document_id = %document.id, "评论已提交");
        Ok(Notification::success(
            self.formatter.locale(),
            crate::i18n::t_in(self.formatter.locale(), "notify.comment_sent"),
        ))
    }

    fn record(
        &self,
        document: &DocumentRecord,
        client: Option<String>,
        outcome: ActivityOutcome,
        detail: String,
    ) {
        let entry = ActivityEntry::now(
            ActionType::CommentAdded,
            client,
            Some(document.shipment_id.clone()),
            outcome,
            Some(detail),
        );
        if let Err(e) = self.activity.insert(entry) {
            tracing::warn!("记录活动失败: {}", e);
        }
    }
}
