// ==========================================
// 货代单证管理系统 - 活动日志仓储
// ==========================================
// 职责: 记录提交/评论等操作，供驾驶舱"最近活动"查询
// 存储: 内存环形缓冲（超出容量丢弃最旧记录）
// ==========================================

use crate::domain::action_log::ActivityEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const DEFAULT_CAPACITY: usize = 200;

pub struct ActivityLogRepository {
    entries: Mutex<VecDeque<ActivityEntry>>,
    capacity: usize,
}

impl ActivityLogRepository {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// 追加一条活动
    pub fn insert(&self, entry: ActivityEntry) -> RepositoryResult<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        if guard.len() == self.capacity {
            guard.pop_front();
        }
        tracing::debug!(
            activity_id = %entry.activity_id,
            action = entry.action_type.as_str(),
            "记录活动"
        );
        guard.push_back(entry);
        Ok(())
    }

    /// 最近活动（新→旧）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ActivityEntry>> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityLogRepository {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
