//! 读数内存存储实现
//!
//! 仅用于本地演示和测试。读数按追加顺序保存在 Vec 中。

use crate::error::StorageError;
use crate::models::{ReadingFilter, ReadingRecord};
use crate::traits::ReadingStore;
use std::collections::HashMap;
use std::sync::RwLock;

fn matches(record: &ReadingRecord, filter: &ReadingFilter) -> bool {
    if let Some(device_id) = filter.device_id.as_deref() {
        if record.device_id != device_id {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if record.status != status {
            return false;
        }
    }
    if let Some(since_ms) = filter.since_ms {
        if record.ts_ms < since_ms {
            return false;
        }
    }
    true
}

/// 读数内存存储
pub struct InMemoryReadingStore {
    readings: RwLock<Vec<ReadingRecord>>,
}

impl InMemoryReadingStore {
    /// 创建新的读数存储
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(Vec::new()),
        }
    }

    /// 获取当前累计的读数数量（用于测试）
    pub fn len(&self) -> usize {
        self.readings.read().map(|v| v.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl ReadingStore for InMemoryReadingStore {
    /// 写入单条读数
    async fn create_reading(&self, record: ReadingRecord) -> Result<ReadingRecord, StorageError> {
        let mut readings = self
            .readings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        readings.push(record.clone());
        Ok(record)
    }

    /// 批量写入读数
    async fn create_readings(&self, records: &[ReadingRecord]) -> Result<usize, StorageError> {
        let mut readings = self
            .readings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        readings.extend(records.iter().cloned());
        Ok(records.len())
    }

    /// 按过滤条件查询读数（时间倒序）
    async fn list_readings(
        &self,
        filter: &ReadingFilter,
    ) -> Result<Vec<ReadingRecord>, StorageError> {
        let readings = self
            .readings
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items: Vec<ReadingRecord> = readings
            .iter()
            .filter(|item| matches(item, filter))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    /// 指定设备的最新一条读数
    async fn latest_for_device(
        &self,
        device_id: &str,
    ) -> Result<Option<ReadingRecord>, StorageError> {
        let readings = self
            .readings
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let latest = readings
            .iter()
            .filter(|item| item.device_id == device_id)
            .max_by_key(|item| item.ts_ms)
            .cloned();
        Ok(latest)
    }

    /// 每台设备的最新一条读数
    async fn latest_per_device(&self) -> Result<Vec<ReadingRecord>, StorageError> {
        let readings = self
            .readings
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut latest: HashMap<&str, &ReadingRecord> = HashMap::new();
        for reading in readings.iter() {
            match latest.get(reading.device_id.as_str()) {
                Some(current) if current.ts_ms >= reading.ts_ms => {}
                _ => {
                    latest.insert(reading.device_id.as_str(), reading);
                }
            }
        }
        Ok(latest.into_values().cloned().collect())
    }

    /// 统计指定时刻之后的读数数量
    async fn count_since(&self, since_ms: i64) -> Result<u64, StorageError> {
        let count = self
            .readings
            .read()
            .map(|v| v.iter().filter(|item| item.ts_ms >= since_ms).count())
            .unwrap_or(0);
        Ok(count as u64)
    }
}
