//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - DeviceStore：设备存储
//! - ReadingStore：读数存储
//! - AlertStore：告警存储
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发
//! - 记录由调用方构造，存储层只负责持久化与查询

use crate::error::StorageError;
use crate::models::{
    AlertFilter, AlertRecord, DeviceFilter, DeviceRecord, DeviceUpdate, ReadingFilter,
    ReadingRecord,
};
use async_trait::async_trait;
use domain::{AlertType, DeviceStatus};

/// 设备存储接口
///
/// 提供设备 CRUD、批量状态更新和计数。设备不会被删除，只会停用。
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// 按过滤条件列出设备
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 按内部 id 查找设备
    async fn find_device(&self, id: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 按外部设备编号查找设备
    async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 创建新设备
    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError>;

    /// 部分更新设备，返回更新后的记录
    async fn update_device(
        &self,
        id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 批量更新一组设备的状态，返回更新后的记录
    async fn update_status_many(
        &self,
        ids: &[String],
        status: DeviceStatus,
    ) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 按过滤条件统计设备数量
    async fn count_devices(&self, filter: &DeviceFilter) -> Result<u64, StorageError>;
}

/// 读数存储接口
///
/// 读数只增不改：创建后不可变。
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// 写入单条读数
    async fn create_reading(&self, record: ReadingRecord) -> Result<ReadingRecord, StorageError>;

    /// 批量写入读数
    async fn create_readings(&self, records: &[ReadingRecord]) -> Result<usize, StorageError>;

    /// 按过滤条件查询读数（时间倒序）
    async fn list_readings(
        &self,
        filter: &ReadingFilter,
    ) -> Result<Vec<ReadingRecord>, StorageError>;

    /// 指定设备的最新一条读数
    async fn latest_for_device(
        &self,
        device_id: &str,
    ) -> Result<Option<ReadingRecord>, StorageError>;

    /// 每台设备的最新一条读数
    async fn latest_per_device(&self) -> Result<Vec<ReadingRecord>, StorageError>;

    /// 统计指定时刻之后的读数数量
    async fn count_since(&self, since_ms: i64) -> Result<u64, StorageError>;
}

/// 告警存储接口
///
/// find_recent 是去重门的唯一查询入口；创建路径不加锁，
/// 并发触发下的重复告警是接受的已知竞态。
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// 创建告警
    async fn create_alert(&self, record: AlertRecord) -> Result<AlertRecord, StorageError>;

    /// 查找指定设备、指定类型、指定时刻之后创建的最近一条告警
    async fn find_recent(
        &self,
        device_id: &str,
        alert_type: AlertType,
        since_ms: i64,
    ) -> Result<Option<AlertRecord>, StorageError>;

    /// 按过滤条件列出告警（创建时间倒序）
    async fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<AlertRecord>, StorageError>;

    /// 统计指定时刻之后创建的告警数量
    async fn count_since(&self, since_ms: i64) -> Result<u64, StorageError>;

    /// 标记告警已读
    async fn mark_read(&self, id: &str) -> Result<Option<AlertRecord>, StorageError>;

    /// 标记告警已解决
    async fn resolve(
        &self,
        id: &str,
        resolved_by: Option<&str>,
        resolved_at_ms: i64,
    ) -> Result<Option<AlertRecord>, StorageError>;
}
