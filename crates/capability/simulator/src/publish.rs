//! 事件构造与发布辅助
//!
//! 场景引擎、上报管线和定时恢复共用的发布入口。温度事件必须
//! 双发布（全局主题 + 按设备主题），状态事件只走全局主题。

use coldwatch_events::{
    DeviceStatusChange, EventBus, EventMessage, TemperatureUpdate, topics,
};
use coldwatch_storage::{DeviceRecord, ReadingRecord};

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// 双发布一条温度读数事件。
pub(crate) fn publish_temperature(bus: &EventBus, device: &DeviceRecord, reading: &ReadingRecord) {
    let update = TemperatureUpdate {
        device_id: device.device_id.clone(),
        reading_id: reading.id.clone(),
        temperature: reading.temperature,
        battery: reading.battery,
        status: reading.status.as_str().to_string(),
        ts_ms: reading.ts_ms,
    };
    bus.publish(
        topics::TEMPERATURE_UPDATES,
        EventMessage::TemperatureUpdate(update.clone()),
    );
    bus.publish(
        &topics::temperature_topic_for(&device.device_id),
        EventMessage::TemperatureUpdate(update),
    );
}

/// 发布一条设备状态变更事件。
pub(crate) fn publish_status_change(bus: &EventBus, device: &DeviceRecord) {
    bus.publish(
        topics::DEVICE_STATUS_CHANGED,
        EventMessage::DeviceStatusChanged(DeviceStatusChange {
            device_id: device.device_id.clone(),
            name: device.name.clone(),
            status: device.status.as_str().to_string(),
            battery: device.battery,
            ts_ms: now_epoch_ms(),
        }),
    );
}
