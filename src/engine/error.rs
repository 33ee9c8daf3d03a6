// ==========================================
// 货代单证管理系统 - 引擎层错误类型
// ==========================================
// 职责: 上传流水线 / 客户门户的校验与处理错误
// 分类: (a) 校验错误 - 阻断当前操作，可由用户修正
//       (b) 处理错误 - 记录在文件的 Error 状态上
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntakeError {
    // ===== 提交校验 =====
    #[error("Selecciona al menos un documento para subir")]
    EmptyBatch,

    #[error("Selecciona un envío para asociar los documentos")]
    MissingShipment,

    #[error("Envío no encontrado: {0}")]
    UnknownShipment(String),

    #[error("Archivo no encontrado en la sesión: {0}")]
    FileNotFound(String),

    // ===== 文件约束 =====
    #[error("Formato no soportado: {name} ({extension})")]
    UnsupportedFormat { name: String, extension: String },

    #[error("Archivo demasiado grande: {name} ({size_bytes} bytes, máx. {max_bytes})")]
    FileTooLarge {
        name: String,
        size_bytes: u64,
        max_bytes: u64,
    },

    // ===== 识别 / 外部协作方 =====
    #[error("Clasificación fallida: {0}")]
    Classification(String),

    #[error("Error al enviar el lote: {0}")]
    Sink(String),

    #[error("Error interno: {0}")]
    Internal(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortalError {
    #[error("El comentario no puede estar vacío")]
    EmptyComment,

    #[error("Documento no encontrado: {0}")]
    DocumentNotFound(String),

    #[error("El documento {0} no admite comentarios del cliente")]
    CommentsDisabled(String),

    #[error("Error al enviar el comentario: {0}")]
    Sink(String),
}

pub type IntakeResult<T> = Result<T, IntakeError>;
