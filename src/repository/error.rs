// ==========================================
// 货代单证管理系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Registro no encontrado: {entity} con id={id}")]
    NotFound { entity: String, id: String },

    #[error("Error al adquirir el bloqueo: {0}")]
    LockError(String),

    #[error("Datos inválidos: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
