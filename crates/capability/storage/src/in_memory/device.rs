//! 设备内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 设备 CRUD 操作
//! - 批量状态更新
//! - 过滤计数

use crate::error::StorageError;
use crate::models::{DeviceFilter, DeviceRecord, DeviceUpdate};
use crate::traits::DeviceStore;
use domain::DeviceStatus;
use std::collections::HashMap;
use std::sync::RwLock;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn matches(record: &DeviceRecord, filter: &DeviceFilter) -> bool {
    if let Some(status) = filter.status {
        if record.status != status {
            return false;
        }
    }
    if let Some(is_active) = filter.is_active {
        if record.is_active != is_active {
            return false;
        }
    }
    true
}

fn apply_update(record: &mut DeviceRecord, update: DeviceUpdate) {
    if let Some(name) = update.name {
        record.name = name;
    }
    if let Some(location) = update.location {
        record.location = location;
    }
    if let Some(latitude) = update.latitude {
        record.latitude = Some(latitude);
    }
    if let Some(longitude) = update.longitude {
        record.longitude = Some(longitude);
    }
    if let Some(min_temp) = update.min_temp {
        record.min_temp = Some(min_temp);
    }
    if let Some(max_temp) = update.max_temp {
        record.max_temp = Some(max_temp);
    }
    if let Some(battery) = update.battery {
        record.battery = battery;
    }
    if let Some(status) = update.status {
        record.status = status;
    }
    if let Some(is_active) = update.is_active {
        record.is_active = is_active;
    }
    record.updated_at_ms = now_epoch_ms();
}

/// 设备内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储，按内部 id 索引。
pub struct InMemoryDeviceStore {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl InMemoryDeviceStore {
    /// 创建新的设备存储
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl DeviceStore for InMemoryDeviceStore {
    /// 按过滤条件列出设备
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<DeviceRecord>, StorageError> {
        let mut items: Vec<DeviceRecord> = self
            .devices
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| matches(item, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        // 列表按外部编号排序，保证遍历顺序可预期
        items.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(items)
    }

    /// 按内部 id 查找设备
    async fn find_device(&self, id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let item = self
            .devices
            .read()
            .ok()
            .and_then(|map| map.get(id).cloned());
        Ok(item)
    }

    /// 按外部设备编号查找设备
    async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let item = self
            .devices
            .read()
            .ok()
            .and_then(|map| map.values().find(|item| item.device_id == device_id).cloned());
        Ok(item)
    }

    /// 创建新设备
    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.id) {
            return Err(StorageError::new("device exists"));
        }
        if map.values().any(|item| item.device_id == record.device_id) {
            return Err(StorageError::new("device_id exists"));
        }
        map.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// 部分更新设备
    async fn update_device(
        &self,
        id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.get_mut(id) {
            Some(device) => device,
            None => return Ok(None),
        };
        apply_update(device, update);
        Ok(Some(device.clone()))
    }

    /// 批量更新一组设备的状态
    async fn update_status_many(
        &self,
        ids: &[String],
        status: DeviceStatus,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let now = now_epoch_ms();
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(device) = map.get_mut(id) {
                device.status = status;
                device.updated_at_ms = now;
                updated.push(device.clone());
            }
        }
        Ok(updated)
    }

    /// 按过滤条件统计设备数量
    async fn count_devices(&self, filter: &DeviceFilter) -> Result<u64, StorageError> {
        let count = self
            .devices
            .read()
            .map(|map| map.values().filter(|item| matches(item, filter)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }
}
