//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 设备模型：DeviceRecord, DeviceUpdate, DeviceFilter
//! - 读数模型：ReadingRecord, ReadingFilter
//! - 告警模型：AlertRecord, AlertFilter
//!
//! 记录由调用方完整构造（含 id 和时间戳），存储层不生成标识。
//! 时间一律为 epoch 毫秒（i64）。

use domain::{AlertSeverity, AlertType, DeviceStatus, ReadingStatus};

/// 设备记录。
///
/// `device_id` 是运维侧使用的外部编号（如 "FRZ-001"），`id` 是内部行标识。
/// `min_temp`/`max_temp` 任一缺失表示该设备不做合规校验。
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub id: String,
    pub device_id: String,
    pub name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub battery: i32,
    pub status: DeviceStatus,
    pub is_active: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// 设备部分更新输入。
///
/// None 字段保持原值；updated_at_ms 由存储实现负责刷新。
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub battery: Option<i32>,
    pub status: Option<DeviceStatus>,
    pub is_active: Option<bool>,
}

/// 设备列表过滤条件。
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    pub status: Option<DeviceStatus>,
    pub is_active: Option<bool>,
}

impl DeviceFilter {
    /// 在线且启用的设备（场景引擎随机选取目标用）。
    pub fn online_active() -> Self {
        Self {
            status: Some(DeviceStatus::Online),
            is_active: Some(true),
        }
    }

    /// 离线且启用的设备。
    pub fn offline_active() -> Self {
        Self {
            status: Some(DeviceStatus::Offline),
            is_active: Some(true),
        }
    }
}

/// 读数记录（创建后不可变）。
///
/// `status` 是分类器在写入时派生的快照；设备阈值随后可能被修改，
/// 需要权威判断时应重新分类。
#[derive(Debug, Clone)]
pub struct ReadingRecord {
    pub id: String,
    pub device_id: String,
    pub temperature: f64,
    pub battery: Option<i32>,
    pub status: ReadingStatus,
    pub ts_ms: i64,
}

/// 读数查询过滤条件。
#[derive(Debug, Clone, Default)]
pub struct ReadingFilter {
    pub device_id: Option<String>,
    pub status: Option<ReadingStatus>,
    pub since_ms: Option<i64>,
    pub limit: Option<usize>,
}

/// 告警记录。
#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub id: String,
    pub device_id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub is_resolved: bool,
    pub resolved_at_ms: Option<i64>,
    pub resolved_by: Option<String>,
    pub created_at_ms: i64,
}

/// 告警查询过滤条件。
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub unresolved_only: bool,
    pub limit: Option<usize>,
}
