//! 读数上报管线
//!
//! 真实设备上报与场景引擎生成走同一条路：分类器 -> 存储 ->
//! 告警门 -> 双发布。历史读数携带的 status 只是写入快照，
//! 这里一律按设备当前阈值现算。

use crate::alerts::{AlertGate, excursion_alert};
use crate::classify::classify;
use crate::publish::publish_temperature;
use coldwatch_events::EventBus;
use coldwatch_storage::{
    DeviceStore, DeviceUpdate, ReadingRecord, ReadingStore, StorageError,
};
use coldwatch_telemetry::record_reading_created;
use domain::{AlertSeverity, AlertType, ReadingStatus};
use std::sync::Arc;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// 上报处理错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("device {0} not found")]
    DeviceNotFound(String),
    #[error("storage error: {0}")]
    Store(#[from] StorageError),
}

/// 读数上报管线。
pub struct ReadingIngest {
    devices: Arc<dyn DeviceStore>,
    readings: Arc<dyn ReadingStore>,
    alerts: AlertGate,
    bus: EventBus,
}

impl ReadingIngest {
    pub fn new(
        devices: Arc<dyn DeviceStore>,
        readings: Arc<dyn ReadingStore>,
        alerts: AlertGate,
        bus: EventBus,
    ) -> Self {
        Self {
            devices,
            readings,
            alerts,
            bus,
        }
    }

    /// 处理一条设备上报。
    ///
    /// 按外部设备编号解析设备，现算分类，写入读数；上报携带电量时
    /// 同步刷新设备电量；越界分类经告警门产出温度越界告警；最后
    /// 双发布温度事件。
    pub async fn ingest(
        &self,
        device_id: &str,
        temperature: f64,
        battery: Option<i32>,
        ts_ms: Option<i64>,
    ) -> Result<ReadingRecord, IngestError> {
        let device = self
            .devices
            .find_by_device_id(device_id)
            .await?
            .ok_or_else(|| IngestError::DeviceNotFound(device_id.to_string()))?;
        let status = classify(temperature, device.min_temp, device.max_temp);
        let reading = ReadingRecord {
            id: uuid::Uuid::new_v4().to_string(),
            device_id: device.id.clone(),
            temperature,
            battery,
            status,
            ts_ms: ts_ms.unwrap_or_else(now_epoch_ms),
        };
        let reading = self.readings.create_reading(reading).await?;
        record_reading_created();
        let device = match battery {
            Some(battery) => self
                .devices
                .update_device(
                    &device.id,
                    DeviceUpdate {
                        battery: Some(battery),
                        ..DeviceUpdate::default()
                    },
                )
                .await?
                .unwrap_or(device),
            None => device,
        };
        if status != ReadingStatus::Normal {
            let severity = match status {
                ReadingStatus::Critical => AlertSeverity::Critical,
                _ => AlertSeverity::Warning,
            };
            let (title, message) = excursion_alert(&device, temperature);
            self.alerts
                .create_if_new(
                    &device.id,
                    AlertType::TemperatureExcursion,
                    severity,
                    &title,
                    &message,
                )
                .await?;
        }
        publish_temperature(&self.bus, &device, &reading);
        Ok(reading)
    }
}
