// ==========================================
// 货代单证管理系统 - 客户单证目录仓储
// ==========================================
// 职责: 客户门户单证读取
// 存储: 内存 (样例数据 / 导入文件)
// ==========================================

use crate::domain::document::DocumentRecord;
use crate::importer::DirectoryImporter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::path::Path;
use std::sync::RwLock;

/// 单证目录（外部协作方接口）
pub trait DocumentDirectory: Send + Sync {
    fn list_documents(&self) -> RepositoryResult<Vec<DocumentRecord>>;

    fn find_document(&self, id: &str) -> RepositoryResult<Option<DocumentRecord>>;

    /// 某运单下的单证
    fn list_by_shipment(&self, shipment_id: &str) -> RepositoryResult<Vec<DocumentRecord>> {
        Ok(self
            .list_documents()?
            .into_iter()
            .filter(|d| d.shipment_id == shipment_id)
            .collect())
    }
}

pub struct DocumentRepository {
    records: RwLock<Vec<DocumentRecord>>,
}

impl DocumentRepository {
    pub fn new(records: Vec<DocumentRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn with_samples() -> Self {
        Self::new(crate::repository::seed::sample_documents())
    }

    pub fn from_file(path: &Path) -> RepositoryResult<Self> {
        let records = DirectoryImporter::new().load_documents(path)?;
        Ok(Self::new(records))
    }
}

impl DocumentDirectory for DocumentRepository {
    fn list_documents(&self) -> RepositoryResult<Vec<DocumentRecord>> {
        let guard = self
            .records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }

    fn find_document(&self, id: &str) -> RepositoryResult<Option<DocumentRecord>> {
        let guard = self
            .records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.iter().find(|d| d.id == id).cloned())
    }
}
