//! 主题名常量
//!
//! 主题是扇出总线的字符串键。温度主题成对使用：全局主题加
//! 按设备主题（`TEMPERATURE_UPDATES_<设备编号>`），发布方必须
//! 同时写两者。

/// 全局温度读数主题。
pub const TEMPERATURE_UPDATES: &str = "TEMPERATURE_UPDATES";

/// 设备状态变更主题。
pub const DEVICE_STATUS_CHANGED: &str = "DEVICE_STATUS_CHANGED";

/// 心跳主题：按固定间隔发布，用于验证推送链路存活。
pub const PING: &str = "PING";

/// 指定设备的温度主题名。
pub fn temperature_topic_for(device_id: &str) -> String {
    format!("{TEMPERATURE_UPDATES}_{device_id}")
}
