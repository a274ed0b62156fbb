//! Handlers 模块

pub mod alerts;
pub mod devices;
pub mod health;
pub mod metrics;
pub mod readings;
pub mod realtime;
pub mod simulator;

pub use alerts::*;
pub use devices::*;
pub use health::*;
pub use metrics::*;
pub use readings::*;
pub use realtime::*;
pub use simulator::*;
