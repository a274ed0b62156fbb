//! # Coldwatch Events 模块
//!
//! 进程内事件扇出能力：按主题名发布/订阅，供实时推送层消费。
//!
//! ## 设计要点
//!
//! - **尽力投递**：只投递给发布瞬间已挂接的订阅者，没有回放缓冲；
//!   订阅晚于发布的消息不可见
//! - **懒生命周期**：主题条目随首个订阅创建，最后一个订阅离开即回收；
//!   向无人订阅的主题发布是投递数为 0 的空操作
//! - **双发布约定**：按设备过滤由发布方同时写全局主题和
//!   `<全局主题>_<设备编号>` 主题实现，总线本身不做过滤
//! - **及时退订**：订阅句柄 Drop 时立即从注册表移除，总线不持有
//!   已断开订阅者的引用
//!
//! ## 模块说明
//!
//! - [`topics`]：主题名常量与按设备主题名构造
//! - [`messages`]：事件载荷类型
//! - [`bus`]：EventBus / EventSubscription
//! - [`heartbeat`]：PING 心跳后台发布任务

pub mod bus;
pub mod heartbeat;
pub mod messages;
pub mod topics;

pub use bus::{EventBus, EventSubscription};
pub use heartbeat::spawn_heartbeat;
pub use messages::{DeviceStatusChange, EventMessage, Heartbeat, TemperatureUpdate};
