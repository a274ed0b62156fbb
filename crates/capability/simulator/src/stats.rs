//! 车队统计门面
//!
//! 按需从存储现算快照，不缓存。存储失败时降级为全零快照，
//! 保证仪表盘轮询不中断。

use crate::classify::classify;
use coldwatch_storage::{
    AlertStore, DeviceFilter, DeviceStore, ReadingFilter, ReadingStore, StorageError,
};
use domain::{DeviceStatus, ReadingStatus};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// 低电量判定阈值（%）。
const LOW_BATTERY_THRESHOLD: i32 = 20;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// 车队统计快照（临时值对象，每次现算）。
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatorStats {
    pub total_devices: u64,
    pub online_devices: u64,
    pub offline_devices: u64,
    pub low_battery_devices: u64,
    pub critical_devices_last_hour: u64,
    pub readings_last_24h: u64,
    pub alerts_last_24h: u64,
}

/// 车队统计门面。
pub struct FleetStats {
    devices: Arc<dyn DeviceStore>,
    readings: Arc<dyn ReadingStore>,
    alerts: Arc<dyn AlertStore>,
}

impl FleetStats {
    pub fn new(
        devices: Arc<dyn DeviceStore>,
        readings: Arc<dyn ReadingStore>,
        alerts: Arc<dyn AlertStore>,
    ) -> Self {
        Self {
            devices,
            readings,
            alerts,
        }
    }

    /// 现算一份快照；存储失败降级为全零。
    pub async fn snapshot(&self) -> SimulatorStats {
        match self.collect().await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(target: "coldwatch.simulator", error = %err, "stats_degraded_to_zero");
                SimulatorStats::default()
            }
        }
    }

    async fn collect(&self) -> Result<SimulatorStats, StorageError> {
        let now = now_epoch_ms();
        let total_devices = self.devices.count_devices(&DeviceFilter::default()).await?;
        let online_devices = self
            .devices
            .count_devices(&DeviceFilter {
                status: Some(DeviceStatus::Online),
                is_active: None,
            })
            .await?;
        let offline_devices = self
            .devices
            .count_devices(&DeviceFilter {
                status: Some(DeviceStatus::Offline),
                is_active: None,
            })
            .await?;

        // 每台设备最新一条读数里电量低于阈值的设备数
        let low_battery_devices = self
            .readings
            .latest_per_device()
            .await?
            .iter()
            .filter(|reading| matches!(reading.battery, Some(battery) if battery < LOW_BATTERY_THRESHOLD))
            .count() as u64;

        // 近一小时内出现 critical 读数的设备（按设备去重）。
        // 落库的 status 是写入时的快照，这里按设备当前阈值重新分类。
        let thresholds: HashMap<String, (Option<f64>, Option<f64>)> = self
            .devices
            .list_devices(&DeviceFilter::default())
            .await?
            .into_iter()
            .map(|device| (device.id, (device.min_temp, device.max_temp)))
            .collect();
        let recent = self
            .readings
            .list_readings(&ReadingFilter {
                since_ms: Some(now - HOUR_MS),
                ..ReadingFilter::default()
            })
            .await?;
        let mut critical_devices: HashSet<String> = HashSet::new();
        for reading in recent {
            let status = match thresholds.get(&reading.device_id) {
                Some((min_temp, max_temp)) => classify(reading.temperature, *min_temp, *max_temp),
                None => reading.status,
            };
            if status == ReadingStatus::Critical {
                critical_devices.insert(reading.device_id);
            }
        }

        let readings_last_24h = self.readings.count_since(now - DAY_MS).await?;
        let alerts_last_24h = self.alerts.count_since(now - DAY_MS).await?;

        Ok(SimulatorStats {
            total_devices,
            online_devices,
            offline_devices,
            low_battery_devices,
            critical_devices_last_hour: critical_devices.len() as u64,
            readings_last_24h,
            alerts_last_24h,
        })
    }
}
