// ==========================================
// 货代单证管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato no soportado: {0} (solo .csv/.json)")]
    UnsupportedFormat(String),

    #[error("Error de lectura: {0}")]
    FileReadError(String),

    #[error("Error de CSV: {0}")]
    CsvParseError(String),

    #[error("Error de JSON: {0}")]
    JsonParseError(String),

    // ===== 数据映射错误 =====
    #[error("Campo obligatorio ausente (fila {row}): {field}")]
    MissingField { row: usize, field: String },

    #[error("Conversión fallida (fila {row}, campo {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("Fecha inválida (fila {row}, campo {field}): se esperaba YYYY-MM-DD, valor {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== 数据质量错误 =====
    #[error("Identificador duplicado (fila {row}): {id}")]
    DuplicateId { row: usize, id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
