//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - DeviceStore: InMemoryDeviceStore
//! - ReadingStore: InMemoryReadingStore
//! - AlertStore: InMemoryAlertStore

pub mod alert;
pub mod device;
pub mod reading;

pub use alert::*;
pub use device::*;
pub use reading::*;
