pub mod data;

pub use data::{AlertSeverity, AlertType, DeviceStatus, ReadingStatus};
