// ==========================================
// 货代单证管理系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误为统一的 ApiError，并转换为用户提示
// 分类:
//   - 校验错误: 阻断当前操作，以提示形式展示
//   - 业务/数据错误: 附带显式原因
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::{IntakeError, PortalError};
use crate::i18n;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 用户校验错误
    // ==========================================
    #[error("Selecciona al menos un documento para subir")]
    EmptyBatch,

    #[error("Selecciona un envío para asociar los documentos")]
    MissingShipment,

    #[error("El comentario no puede estar vacío")]
    EmptyComment,

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Recurso no encontrado: {0}")]
    NotFound(String),

    #[error("Regla de negocio violada: {0}")]
    BusinessRuleViolation(String),

    #[error("Validación de archivo fallida: {0}")]
    ValidationError(String),

    // ==========================================
    // 数据/配置/外部协作方
    // ==========================================
    #[error("Importación fallida: {0}")]
    ImportError(String),

    #[error("Configuración inválida: {0}")]
    ConfigError(String),

    #[error("Servicio externo fallido: {0}")]
    ExternalServiceError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Error interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误码（供界面层/日志检索）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::EmptyBatch => "EMPTY_BATCH",
            ApiError::MissingShipment => "MISSING_SHIPMENT",
            ApiError::EmptyComment => "EMPTY_COMMENT",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER",
        }
    }

    /// 是否为用户可修正的校验错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::EmptyBatch
                | ApiError::MissingShipment
                | ApiError::EmptyComment
                | ApiError::InvalidInput(_)
                | ApiError::ValidationError(_)
        )
    }

    /// 有本地化文案的错误对应的 i18n key
    fn message_key(&self) -> Option<&'static str> {
        match self {
            ApiError::EmptyBatch => Some("notify.empty_batch"),
            ApiError::MissingShipment => Some("notify.missing_shipment"),
            ApiError::EmptyComment => Some("notify.empty_comment"),
            _ => None,
        }
    }
}

// ==========================================
// 从各层错误转换
// ==========================================
impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::EmptyBatch => ApiError::EmptyBatch,
            IntakeError::MissingShipment => ApiError::MissingShipment,
            IntakeError::UnknownShipment(id) => ApiError::NotFound(format!("Envío {}", id)),
            IntakeError::FileNotFound(id) => ApiError::NotFound(format!("Archivo {}", id)),
            e @ (IntakeError::UnsupportedFormat { .. } | IntakeError::FileTooLarge { .. }) => {
                ApiError::ValidationError(e.to_string())
            }
            IntakeError::Classification(msg) | IntakeError::Sink(msg) => {
                ApiError::ExternalServiceError(msg)
            }
            IntakeError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::EmptyComment => ApiError::EmptyComment,
            PortalError::DocumentNotFound(id) => ApiError::NotFound(format!("Documento {}", id)),
            e @ PortalError::CommentsDisabled(_) => ApiError::BusinessRuleViolation(e.to_string()),
            PortalError::Sink(msg) => ApiError::ExternalServiceError(msg),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::InternalError(format!("Error al adquirir el bloqueo: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::Import(e) => e.into(),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// Notification - 用户提示
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(locale: &str, description: impl Into<String>) -> Self {
        Self {
            title: i18n::t_in(locale, "notify.success_title"),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    /// 错误提示（校验错误使用本地化文案）
    pub fn from_error(err: &ApiError, locale: &str) -> Self {
        let description = match err.message_key() {
            Some(key) => i18n::t_in(locale, key),
            None => err.to_string(),
        };
        Self {
            title: i18n::t_in(locale, "notify.error_title"),
            description,
            variant: NotificationVariant::Destructive,
        }
    }
}
