//! 告警内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::models::{AlertFilter, AlertRecord};
use crate::traits::AlertStore;
use domain::AlertType;
use std::collections::HashMap;
use std::sync::RwLock;

/// 告警内存存储
pub struct InMemoryAlertStore {
    alerts: RwLock<HashMap<String, AlertRecord>>,
}

impl InMemoryAlertStore {
    /// 创建新的告警存储
    pub fn new() -> Self {
        Self {
            alerts: RwLock::new(HashMap::new()),
        }
    }

    /// 获取当前告警数量（用于测试）
    pub fn len(&self) -> usize {
        self.alerts.read().map(|m| m.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl AlertStore for InMemoryAlertStore {
    /// 创建告警
    async fn create_alert(&self, record: AlertRecord) -> Result<AlertRecord, StorageError> {
        let mut map = self
            .alerts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.id) {
            return Err(StorageError::new("alert exists"));
        }
        map.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// 查找指定设备、指定类型、指定时刻之后创建的最近一条告警
    async fn find_recent(
        &self,
        device_id: &str,
        alert_type: AlertType,
        since_ms: i64,
    ) -> Result<Option<AlertRecord>, StorageError> {
        let map = self
            .alerts
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let recent = map
            .values()
            .filter(|item| {
                item.device_id == device_id
                    && item.alert_type == alert_type
                    && item.created_at_ms >= since_ms
            })
            .max_by_key(|item| item.created_at_ms)
            .cloned();
        Ok(recent)
    }

    /// 按过滤条件列出告警（创建时间倒序）
    async fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<AlertRecord>, StorageError> {
        let map = self
            .alerts
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items: Vec<AlertRecord> = map
            .values()
            .filter(|item| !filter.unresolved_only || !item.is_resolved)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    /// 统计指定时刻之后创建的告警数量
    async fn count_since(&self, since_ms: i64) -> Result<u64, StorageError> {
        let count = self
            .alerts
            .read()
            .map(|m| {
                m.values()
                    .filter(|item| item.created_at_ms >= since_ms)
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }

    /// 标记告警已读
    async fn mark_read(&self, id: &str) -> Result<Option<AlertRecord>, StorageError> {
        let mut map = self
            .alerts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let alert = match map.get_mut(id) {
            Some(alert) => alert,
            None => return Ok(None),
        };
        alert.is_read = true;
        Ok(Some(alert.clone()))
    }

    /// 标记告警已解决
    async fn resolve(
        &self,
        id: &str,
        resolved_by: Option<&str>,
        resolved_at_ms: i64,
    ) -> Result<Option<AlertRecord>, StorageError> {
        let mut map = self
            .alerts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let alert = match map.get_mut(id) {
            Some(alert) => alert,
            None => return Ok(None),
        };
        alert.is_resolved = true;
        alert.resolved_at_ms = Some(resolved_at_ms);
        alert.resolved_by = resolved_by.map(|s| s.to_string());
        Ok(Some(alert.clone()))
    }
}
