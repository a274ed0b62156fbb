//! 告警门：去重窗口 + 创建
//!
//! 创建路径唯一入口。同一 (设备, 类型) 在窗口内已有告警则抑制。
//! 检查与创建之间没有锁：并发触发可能双双通过检查产生重复告警，
//! 这是接受的已知竞态（告警是运维提示，不是计费记录）。
//! 检查本身失败时直接向上传播，调用方必须放弃本次告警创建，
//! 不允许猜测"没有重复"。

use coldwatch_storage::{AlertRecord, AlertStore, DeviceRecord, StorageError};
use coldwatch_telemetry::{record_alert_created, record_alert_suppressed};
use domain::{AlertSeverity, AlertType};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// 去重窗口缺省 5 分钟。
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(5 * 60);

/// 告警门。
pub struct AlertGate {
    store: Arc<dyn AlertStore>,
    window: Duration,
}

impl AlertGate {
    pub fn new(store: Arc<dyn AlertStore>, window: Duration) -> Self {
        Self { store, window }
    }

    /// 判断是否应为 (设备, 类型) 创建新告警。
    ///
    /// 窗口内已有同类告警返回 false。存储失败原样传播。
    pub async fn should_create(
        &self,
        device_row_id: &str,
        alert_type: AlertType,
    ) -> Result<bool, StorageError> {
        let since_ms = now_epoch_ms() - self.window.as_millis() as i64;
        let recent = self
            .store
            .find_recent(device_row_id, alert_type, since_ms)
            .await?;
        Ok(recent.is_none())
    }

    /// 通过去重门创建告警；被抑制时返回 None。
    pub async fn create_if_new(
        &self,
        device_row_id: &str,
        alert_type: AlertType,
        severity: AlertSeverity,
        title: &str,
        message: &str,
    ) -> Result<Option<AlertRecord>, StorageError> {
        if !self.should_create(device_row_id, alert_type).await? {
            record_alert_suppressed();
            debug!(
                target: "coldwatch.simulator",
                device_row_id,
                alert_type = alert_type.as_str(),
                "alert_suppressed"
            );
            return Ok(None);
        }
        let record = AlertRecord {
            id: uuid::Uuid::new_v4().to_string(),
            device_id: device_row_id.to_string(),
            alert_type,
            severity,
            title: title.to_string(),
            message: message.to_string(),
            is_read: false,
            is_resolved: false,
            resolved_at_ms: None,
            resolved_by: None,
            created_at_ms: now_epoch_ms(),
        };
        let record = self.store.create_alert(record).await?;
        record_alert_created();
        Ok(Some(record))
    }
}

/// 温度越界告警的标题与正文。
pub fn excursion_alert(device: &DeviceRecord, temperature: f64) -> (String, String) {
    let range = match (device.min_temp, device.max_temp) {
        (Some(min), Some(max)) => format!(" (allowed {min:.1}°C to {max:.1}°C)"),
        _ => String::new(),
    };
    (
        "Temperature excursion".to_string(),
        format!(
            "Device {} ({}) reported {temperature:.1}°C outside the safe range{range}",
            device.name, device.device_id
        ),
    )
}

/// 低电量告警的标题与正文。
pub fn low_battery_alert(device: &DeviceRecord, battery: i32) -> (String, String) {
    (
        "Low battery".to_string(),
        format!(
            "Device {} ({}) battery dropped to {battery}%",
            device.name, device.device_id
        ),
    )
}

/// 设备离线告警的标题与正文。
pub fn offline_alert(device: &DeviceRecord) -> (String, String) {
    (
        "Device offline".to_string(),
        format!(
            "Device {} ({}) stopped reporting and went offline",
            device.name, device.device_id
        ),
    )
}
