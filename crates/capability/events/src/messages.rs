//! 事件载荷类型
//!
//! 载荷是自包含的快照（外部设备编号、规范状态字符串、epoch 毫秒），
//! 不引用存储层记录，订阅方无需回查数据库即可渲染。

use serde::Serialize;

/// 温度读数事件载荷。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureUpdate {
    pub device_id: String,
    pub reading_id: String,
    pub temperature: f64,
    pub battery: Option<i32>,
    pub status: String,
    pub ts_ms: i64,
}

/// 设备状态变更事件载荷。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusChange {
    pub device_id: String,
    pub name: String,
    pub status: String,
    pub battery: i32,
    pub ts_ms: i64,
}

/// 心跳载荷。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    pub ts_ms: i64,
}

/// 总线上流转的事件消息。
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventMessage {
    TemperatureUpdate(TemperatureUpdate),
    DeviceStatusChanged(DeviceStatusChange),
    Ping(Heartbeat),
}

impl EventMessage {
    /// 事件种类名（SSE event 字段用）。
    pub fn kind(&self) -> &'static str {
        match self {
            EventMessage::TemperatureUpdate(_) => "temperatureUpdate",
            EventMessage::DeviceStatusChanged(_) => "deviceStatusChanged",
            EventMessage::Ping(_) => "ping",
        }
    }
}
