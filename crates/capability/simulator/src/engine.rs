//! 设备场景引擎
//!
//! Device.status 之上的状态机，由命名场景驱动：
//!
//! - trigger_excursion：目标设备写入一条越界温度读数
//! - simulate_low_battery：目标设备电量降到 [5, 20)
//! - take_device_offline：目标设备置为 offline
//! - simulate_power_outage：全部在线设备批量断电，延迟后自动恢复
//! - simulate_batch_arrival：最多 3 台离线设备批量到货上线
//! - return_to_normal：全部离线/维护设备回到在线
//!
//! 每个场景是一串存储调用加事件发布，没有跨步事务：中途失败
//! 留下部分完成的状态（尽力而为语义）。三类失败（目标不存在、
//! 前置条件不满足、存储失败）都在场景边界收敛为
//! SimulatorResult{success:false}，不向调用方抛错。

use crate::alerts::{AlertGate, excursion_alert, low_battery_alert, offline_alert};
use crate::classify::classify;
use crate::publish::{publish_status_change, publish_temperature};
use crate::recovery::schedule;
use coldwatch_events::EventBus;
use coldwatch_storage::{
    DeviceFilter, DeviceRecord, DeviceStore, DeviceUpdate, ReadingRecord, ReadingStore,
    StorageError,
};
use coldwatch_telemetry::{
    record_reading_created, record_recovery_run, record_scenario_failure,
    record_scenario_triggered,
};
use domain::{AlertSeverity, AlertType, DeviceStatus, ReadingStatus};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 越界场景写入的固定哨兵温度（°C）。
pub const EXCURSION_TEMP_C: f64 = 12.0;

/// 低电量场景的电量区间：[5, 20)。
const LOW_BATTERY_RANGE: std::ops::Range<i32> = 5..20;

/// 到货/恢复正常时刷新的电量区间：[85, 100]。
const REFRESH_BATTERY_RANGE: std::ops::RangeInclusive<i32> = 85..=100;

/// 批量到货单次最多处理的设备数。
const BATCH_ARRIVAL_LIMIT: usize = 3;

/// 未配置阈值的设备使用的正常温度（°C）。
const DEFAULT_NORMAL_TEMP_C: f64 = 5.0;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 场景执行结果（临时值对象，不落库）。
#[derive(Debug, Clone)]
pub struct SimulatorResult {
    pub success: bool,
    pub message: String,
    pub affected_devices: Vec<DeviceRecord>,
}

impl SimulatorResult {
    pub fn ok(message: impl Into<String>, affected_devices: Vec<DeviceRecord>) -> Self {
        Self {
            success: true,
            message: message.into(),
            affected_devices,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            affected_devices: Vec::new(),
        }
    }
}

/// 引擎参数。
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// 断电场景的自动恢复延迟。
    pub recovery_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            recovery_delay: Duration::from_secs(30),
        }
    }
}

/// 场景内部失败分类，在边界统一转为失败结果。
#[derive(Debug, thiserror::Error)]
enum ScenarioError {
    #[error("device {0} not found")]
    NotFound(String),
    #[error("device {0} is not online")]
    NotOnline(String),
    #[error("no online devices available")]
    NoOnlineDevices,
    #[error("no offline devices available")]
    NoOfflineDevices,
    #[error("storage error: {0}")]
    Store(#[from] StorageError),
}

/// 设备场景引擎。
///
/// 显式持有存储与总线依赖，由宿主按需共享；没有进程级单例。
pub struct ScenarioEngine {
    devices: Arc<dyn DeviceStore>,
    readings: Arc<dyn ReadingStore>,
    alerts: AlertGate,
    bus: EventBus,
    config: SimulatorConfig,
}

impl ScenarioEngine {
    pub fn new(
        devices: Arc<dyn DeviceStore>,
        readings: Arc<dyn ReadingStore>,
        alerts: AlertGate,
        bus: EventBus,
        config: SimulatorConfig,
    ) -> Self {
        Self {
            devices,
            readings,
            alerts,
            bus,
            config,
        }
    }

    /// 触发温度越界：目标设备写入一条哨兵温度读数并双发布。
    pub async fn trigger_excursion(&self, device_id: Option<&str>) -> SimulatorResult {
        let result = self.run_excursion(device_id).await;
        self.finish("trigger_excursion", result)
    }

    /// 模拟低电量：目标设备电量降到 [5, 20) 并写入一条正常温度读数。
    pub async fn simulate_low_battery(&self, device_id: Option<&str>) -> SimulatorResult {
        let result = self.run_low_battery(device_id).await;
        self.finish("simulate_low_battery", result)
    }

    /// 使目标设备离线。
    pub async fn take_device_offline(&self, device_id: Option<&str>) -> SimulatorResult {
        let result = self.run_take_offline(device_id).await;
        self.finish("take_device_offline", result)
    }

    /// 模拟全场断电：全部在线设备离线，延迟后自动恢复。
    pub async fn simulate_power_outage(&self) -> SimulatorResult {
        let result = self.run_power_outage().await;
        self.finish("simulate_power_outage", result)
    }

    /// 模拟批量到货：最多 3 台离线设备上线并刷新电量。
    pub async fn simulate_batch_arrival(&self) -> SimulatorResult {
        let result = self.run_batch_arrival().await;
        self.finish("simulate_batch_arrival", result)
    }

    /// 恢复正常：全部离线/维护设备上线。无可恢复设备是成功的空操作。
    pub async fn return_to_normal(&self) -> SimulatorResult {
        let result = self.run_return_to_normal().await;
        self.finish("return_to_normal", result)
    }

    fn finish(
        &self,
        scenario: &str,
        result: Result<SimulatorResult, ScenarioError>,
    ) -> SimulatorResult {
        record_scenario_triggered();
        match result {
            Ok(result) => {
                info!(
                    target: "coldwatch.simulator",
                    scenario,
                    affected = result.affected_devices.len(),
                    message = %result.message,
                    "scenario_completed"
                );
                result
            }
            Err(err) => {
                record_scenario_failure();
                warn!(target: "coldwatch.simulator", scenario, error = %err, "scenario_failed");
                SimulatorResult::failure(err.to_string())
            }
        }
    }

    /// 解析目标设备：显式编号必须在线；缺省时随机选一台在线启用设备。
    async fn resolve_target(
        &self,
        device_id: Option<&str>,
    ) -> Result<DeviceRecord, ScenarioError> {
        match device_id {
            Some(device_id) => {
                let device = self
                    .devices
                    .find_by_device_id(device_id)
                    .await?
                    .ok_or_else(|| ScenarioError::NotFound(device_id.to_string()))?;
                if device.status != DeviceStatus::Online {
                    return Err(ScenarioError::NotOnline(device_id.to_string()));
                }
                Ok(device)
            }
            None => {
                let mut candidates = self
                    .devices
                    .list_devices(&DeviceFilter::online_active())
                    .await?;
                if candidates.is_empty() {
                    return Err(ScenarioError::NoOnlineDevices);
                }
                let index = rand::thread_rng().gen_range(0..candidates.len());
                Ok(candidates.swap_remove(index))
            }
        }
    }

    async fn run_excursion(
        &self,
        device_id: Option<&str>,
    ) -> Result<SimulatorResult, ScenarioError> {
        let device = self.resolve_target(device_id).await?;
        let status = classify(EXCURSION_TEMP_C, device.min_temp, device.max_temp);
        let reading = ReadingRecord {
            id: new_id(),
            device_id: device.id.clone(),
            temperature: EXCURSION_TEMP_C,
            battery: Some(device.battery),
            status,
            ts_ms: now_epoch_ms(),
        };
        let reading = self.readings.create_reading(reading).await?;
        record_reading_created();
        if status != ReadingStatus::Normal {
            let severity = match status {
                ReadingStatus::Critical => AlertSeverity::Critical,
                _ => AlertSeverity::Warning,
            };
            let (title, message) = excursion_alert(&device, reading.temperature);
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
        Ok(SimulatorResult::ok(
            format!(
                "Triggered temperature excursion ({EXCURSION_TEMP_C}°C) on {}",
                device.name
            ),
            vec![device],
        ))
    }

    async fn run_low_battery(
        &self,
        device_id: Option<&str>,
    ) -> Result<SimulatorResult, ScenarioError> {
        let device = self.resolve_target(device_id).await?;
        let battery = rand::thread_rng().gen_range(LOW_BATTERY_RANGE);
        let device = self
            .devices
            .update_device(
                &device.id,
                DeviceUpdate {
                    battery: Some(battery),
                    ..DeviceUpdate::default()
                },
            )
            .await?
            .ok_or_else(|| ScenarioError::NotFound(device.device_id.clone()))?;
        self.create_normal_reading(&device).await?;
        let (title, message) = low_battery_alert(&device, battery);
        self.alerts
            .create_if_new(
                &device.id,
                AlertType::LowBattery,
                AlertSeverity::Warning,
                &title,
                &message,
            )
            .await?;
        publish_status_change(&self.bus, &device);
        Ok(SimulatorResult::ok(
            format!("Simulated low battery ({battery}%) on {}", device.name),
            vec![device],
        ))
    }

    async fn run_take_offline(
        &self,
        device_id: Option<&str>,
    ) -> Result<SimulatorResult, ScenarioError> {
        let device = self.resolve_target(device_id).await?;
        let device = self
            .devices
            .update_device(
                &device.id,
                DeviceUpdate {
                    status: Some(DeviceStatus::Offline),
                    ..DeviceUpdate::default()
                },
            )
            .await?
            .ok_or_else(|| ScenarioError::NotFound(device.device_id.clone()))?;
        let (title, message) = offline_alert(&device);
        self.alerts
            .create_if_new(
                &device.id,
                AlertType::DeviceOffline,
                AlertSeverity::Warning,
                &title,
                &message,
            )
            .await?;
        publish_status_change(&self.bus, &device);
        Ok(SimulatorResult::ok(
            format!("Device {} taken offline", device.name),
            vec![device],
        ))
    }

    async fn run_power_outage(&self) -> Result<SimulatorResult, ScenarioError> {
        let affected = self
            .devices
            .list_devices(&DeviceFilter::online_active())
            .await?;
        if affected.is_empty() {
            return Err(ScenarioError::NoOnlineDevices);
        }
        let ids: Vec<String> = affected.iter().map(|d| d.id.clone()).collect();
        let updated = self
            .devices
            .update_status_many(&ids, DeviceStatus::Offline)
            .await?;
        for device in &updated {
            publish_status_change(&self.bus, device);
        }
        // 定时恢复与本次调用解耦：失败只记日志，不回传
        let devices = Arc::clone(&self.devices);
        let bus = self.bus.clone();
        let delay = self.config.recovery_delay;
        schedule(delay, move || recover_power_outage(devices, bus, ids));
        Ok(SimulatorResult::ok(
            format!(
                "Power outage simulated for {} devices, automatic recovery in {}s",
                updated.len(),
                delay.as_secs()
            ),
            updated,
        ))
    }

    async fn run_batch_arrival(&self) -> Result<SimulatorResult, ScenarioError> {
        let offline = self
            .devices
            .list_devices(&DeviceFilter::offline_active())
            .await?;
        if offline.is_empty() {
            return Err(ScenarioError::NoOfflineDevices);
        }
        let mut affected = Vec::new();
        for device in offline.into_iter().take(BATCH_ARRIVAL_LIMIT) {
            let battery = rand::thread_rng().gen_range(REFRESH_BATTERY_RANGE);
            let Some(device) = self
                .devices
                .update_device(
                    &device.id,
                    DeviceUpdate {
                        status: Some(DeviceStatus::Online),
                        battery: Some(battery),
                        ..DeviceUpdate::default()
                    },
                )
                .await?
            else {
                continue;
            };
            publish_status_change(&self.bus, &device);
            let reading = self.create_normal_reading(&device).await?;
            publish_temperature(&self.bus, &device, &reading);
            affected.push(device);
        }
        Ok(SimulatorResult::ok(
            format!("{} devices arrived and came online", affected.len()),
            affected,
        ))
    }

    async fn run_return_to_normal(&self) -> Result<SimulatorResult, ScenarioError> {
        let mut eligible = self
            .devices
            .list_devices(&DeviceFilter::offline_active())
            .await?;
        let maintenance = self
            .devices
            .list_devices(&DeviceFilter {
                status: Some(DeviceStatus::Maintenance),
                is_active: Some(true),
            })
            .await?;
        eligible.extend(maintenance);
        // 无可恢复设备：幂等空操作，按成功返回
        if eligible.is_empty() {
            return Ok(SimulatorResult::ok("All devices already online", Vec::new()));
        }
        let mut affected = Vec::new();
        for device in eligible {
            let battery = rand::thread_rng().gen_range(REFRESH_BATTERY_RANGE);
            let Some(device) = self
                .devices
                .update_device(
                    &device.id,
                    DeviceUpdate {
                        status: Some(DeviceStatus::Online),
                        battery: Some(battery),
                        ..DeviceUpdate::default()
                    },
                )
                .await?
            else {
                continue;
            };
            publish_status_change(&self.bus, &device);
            let reading = self.create_normal_reading(&device).await?;
            publish_temperature(&self.bus, &device, &reading);
            affected.push(device);
        }
        Ok(SimulatorResult::ok(
            format!("{} devices returned to normal operation", affected.len()),
            affected,
        ))
    }

    /// 写入一条带当前电量的正常温度读数（分类照常走分类器）。
    async fn create_normal_reading(
        &self,
        device: &DeviceRecord,
    ) -> Result<ReadingRecord, StorageError> {
        let temperature = normal_temperature(device);
        let reading = ReadingRecord {
            id: new_id(),
            device_id: device.id.clone(),
            temperature,
            battery: Some(device.battery),
            status: classify(temperature, device.min_temp, device.max_temp),
            ts_ms: now_epoch_ms(),
        };
        let reading = self.readings.create_reading(reading).await?;
        record_reading_created();
        Ok(reading)
    }
}

/// 阈值带内随机取一个正常温度。
fn normal_temperature(device: &DeviceRecord) -> f64 {
    match (device.min_temp, device.max_temp) {
        (Some(min), Some(max)) if max > min => rand::thread_rng().gen_range(min..max),
        (Some(min), Some(_)) => min,
        _ => DEFAULT_NORMAL_TEMP_C,
    }
}

/// 断电恢复：延迟后把受影响的设备批量拉回在线。
///
/// 延迟期间状态可能被运维改动，因此逐台重新读取，只恢复
/// 仍处于 offline 且启用的设备。
async fn recover_power_outage(devices: Arc<dyn DeviceStore>, bus: EventBus, ids: Vec<String>) {
    record_recovery_run();
    let mut recovered = 0usize;
    for id in &ids {
        let device = match devices.find_device(id).await {
            Ok(Some(device)) => device,
            Ok(None) => continue,
            Err(err) => {
                warn!(target: "coldwatch.simulator", id, error = %err, "recovery_read_failed");
                continue;
            }
        };
        if device.status != DeviceStatus::Offline || !device.is_active {
            continue;
        }
        match devices
            .update_device(
                id,
                DeviceUpdate {
                    status: Some(DeviceStatus::Online),
                    ..DeviceUpdate::default()
                },
            )
            .await
        {
            Ok(Some(device)) => {
                publish_status_change(&bus, &device);
                recovered += 1;
            }
            Ok(None) => {}
            Err(err) => {
                warn!(target: "coldwatch.simulator", id, error = %err, "recovery_update_failed");
            }
        }
    }
    info!(
        target: "coldwatch.simulator",
        scheduled = ids.len(),
        recovered,
        "power_outage_recovery_completed"
    );
}
