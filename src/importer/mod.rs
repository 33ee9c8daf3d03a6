// ==========================================
// 货代单证管理系统 - 导入层
// ==========================================
// 职责: 外部目录数据导入 (运单 / 客户单证)
// 支持: CSV, JSON
// ==========================================

pub mod directory_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use directory_importer::DirectoryImporter;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, FileParser, RawRecord};
