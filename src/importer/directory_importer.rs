// ==========================================
// 货代单证管理系统 - 目录导入器
// ==========================================
// 职责: 从外部导出文件加载运单/单证目录
// 支持: CSV (.csv) / JSON (.json, 数组)
// ==========================================

use crate::domain::document::DocumentRecord;
use crate::domain::shipment::ShipmentSummary;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, FileParser};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use tracing::instrument;

pub struct DirectoryImporter {
    parser: CsvParser,
    mapper: FieldMapper,
}

impl DirectoryImporter {
    pub fn new() -> Self {
        Self {
            parser: CsvParser,
            mapper: FieldMapper,
        }
    }

    /// 加载运单目录
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_shipments(&self, path: &Path) -> ImportResult<Vec<ShipmentSummary>> {
        let shipments = match file_kind(path)? {
            FileKind::Csv => self.map_csv(path, |row, n| self.mapper.map_to_shipment(row, n))?,
            FileKind::Json => read_json::<ShipmentSummary>(path)?,
        };

        ensure_unique(shipments.iter().map(|s| s.id.as_str()))?;
        tracing::info!("运单目录加载完成: {} 条", shipments.len());
        Ok(shipments)
    }

    /// 加载单证目录
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_documents(&self, path: &Path) -> ImportResult<Vec<DocumentRecord>> {
        let documents = match file_kind(path)? {
            FileKind::Csv => self.map_csv(path, |row, n| self.mapper.map_to_document(row, n))?,
            FileKind::Json => read_json::<DocumentRecord>(path)?,
        };

        ensure_unique(documents.iter().map(|d| d.id.as_str()))?;
        tracing::info!("单证目录加载完成: {} 条", documents.len());
        Ok(documents)
    }

    fn map_csv<T, F>(&self, path: &Path, map: F) -> ImportResult<Vec<T>>
    where
        F: Fn(&crate::importer::file_parser::RawRecord, usize) -> ImportResult<T>,
    {
        self.parser
            .parse_to_raw_records(path)?
            .iter()
            .enumerate()
            // 行号从 2 开始（第 1 行为表头）
            .map(|(idx, row)| map(row, idx + 2))
            .collect()
    }
}

impl Default for DirectoryImporter {
    fn default() -> Self {
        Self::new()
    }
}

enum FileKind {
    Csv,
    Json,
}

fn file_kind(path: &Path) -> ImportResult<FileKind> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(FileKind::Csv),
        "json" => Ok(FileKind::Json),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ImportResult<Vec<T>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a str>) -> ImportResult<()> {
    let mut seen = HashSet::new();
    for (idx, id) in ids.enumerate() {
        if !seen.insert(id) {
            return Err(ImportError::DuplicateId {
                row: idx + 1,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_shipments_csv() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,client,origin,destination,status,documents,pendingDocs").unwrap();
        writeln!(file, "SHP-1,ACME Corp,Barcelona,Miami,en_transito,8,2").unwrap();
        writeln!(file, "SHP-2,Global Trade Ltd,Valencia,New York,entregado,12,0").unwrap();

        let shipments = DirectoryImporter::new().load_shipments(file.path()).unwrap();
        assert_eq!(shipments.len(), 2);
        assert_eq!(shipments[1].client, "Global Trade Ltd");
    }

    #[test]
    fn test_load_shipments_duplicate_id() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,client,origin,destination").unwrap();
        writeln!(file, "SHP-1,ACME,A,B").unwrap();
        writeln!(file, "SHP-1,ACME,A,B").unwrap();

        let err = DirectoryImporter::new().load_shipments(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateId { row: 2, .. }));
    }

    #[test]
    fn test_load_documents_json_with_comments() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{
                "id": "DOC-002",
                "shipment_id": "SHP-2024-001",
                "name": "Factura Comercial - ACME Corp",
                "doc_type": "Factura Comercial",
                "upload_date": "2024-01-16",
                "status": "pending_review",
                "size_label": "1.8 MB",
                "comments": [{{
                    "id": 1,
                    "author": "Freight Forwarder",
                    "message": "Favor revisar el valor declarado en la línea 3",
                    "created_at": "2024-01-16T14:30:00",
                    "kind": "request"
                }}]
            }}]"#
        )
        .unwrap();

        let documents = DirectoryImporter::new().load_documents(file.path()).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].comments.len(), 1);
        assert!(documents[0].client_can_comment);
        assert!(documents[0].has_open_request());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = DirectoryImporter::new().load_documents(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }
}
