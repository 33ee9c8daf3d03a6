// ==========================================
// 货代单证管理系统 - 运单目录仓储
// ==========================================
// 职责: 运单目录读取（外部数据服务的本地替身）
// 存储: 内存 (样例数据 / 导入文件)
// ==========================================

use crate::domain::shipment::ShipmentSummary;
use crate::importer::DirectoryImporter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::path::Path;
use std::sync::RwLock;

/// 运单目录（外部协作方接口）
pub trait ShipmentDirectory: Send + Sync {
    /// 按目录顺序列出全部运单
    fn list_shipments(&self) -> RepositoryResult<Vec<ShipmentSummary>>;

    /// 按运单号查找
    fn find_shipment(&self, id: &str) -> RepositoryResult<Option<ShipmentSummary>>;
}

// ==========================================
// ShipmentRepository - 内存实现
// ==========================================
pub struct ShipmentRepository {
    records: RwLock<Vec<ShipmentSummary>>,
}

impl ShipmentRepository {
    pub fn new(records: Vec<ShipmentSummary>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// 使用内置样例数据
    pub fn with_samples() -> Self {
        Self::new(crate::repository::seed::sample_shipments())
    }

    /// 从 CSV/JSON 文件加载
    pub fn from_file(path: &Path) -> RepositoryResult<Self> {
        let records = DirectoryImporter::new().load_shipments(path)?;
        Ok(Self::new(records))
    }

    /// 整体替换目录内容（外部刷新）
    pub fn replace_all(&self, records: Vec<ShipmentSummary>) -> RepositoryResult<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *guard = records;
        Ok(())
    }
}

impl ShipmentDirectory for ShipmentRepository {
    fn list_shipments(&self) -> RepositoryResult<Vec<ShipmentSummary>> {
        let guard = self
            .records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }

    fn find_shipment(&self, id: &str) -> RepositoryResult<Option<ShipmentSummary>> {
        let guard = self
            .records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.iter().find(|s| s.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_lookup() {
        let repo = ShipmentRepository::with_samples();
        assert_eq!(repo.list_shipments().unwrap().len(), 3);

        let found = repo.find_shipment("SHP-2024-002").unwrap().unwrap();
        assert_eq!(found.client, "Global Trade Ltd");
        assert!(repo.find_shipment("SHP-1999-000").unwrap().is_none());
    }

    #[test]
    fn test_replace_all() {
        let repo = ShipmentRepository::with_samples();
        repo.replace_all(Vec::new()).unwrap();
        assert!(repo.list_shipments().unwrap().is_empty());
    }
}
