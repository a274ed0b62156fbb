//! # Coldwatch Simulator 模块
//!
//! 冷链车队的模拟能力：状态机场景、阈值分类、告警去重、
//! 定时恢复与车队统计。
//!
//! ## 架构设计
//!
//! 数据流：场景触发或设备上报 -> 引擎/管线改写设备与读数状态
//! -> 分类器派生读数状态 -> 告警门去重后产出告警 -> 总线按
//! 主题扇出给实时订阅方。
//!
//! 并发模型：每次场景调用是一串异步存储调用加发布，期间没有
//! 跨步事务，部分完成是接受的尽力而为语义；单次调用内的发布
//! 保持引擎写入顺序，跨调用之间不保证顺序。
//!
//! ## 模块说明
//!
//! - [`classify`]：阈值分类器（纯函数，分级规则唯一所在）
//! - [`alerts`]：告警门（去重窗口 + 创建 + 文案生成）
//! - [`engine`]：场景引擎（六个命名场景与恢复任务）
//! - [`recovery`]：定时调度（延迟执行一次性动作，不持久化）
//! - [`ingest`]：读数上报管线（与场景共用分类/告警/发布路径）
//! - [`stats`]：车队统计门面（现算快照，失败降级全零）

pub mod alerts;
pub mod classify;
pub mod engine;
pub mod ingest;
pub mod recovery;
pub mod stats;

mod publish;

pub use alerts::{AlertGate, DEFAULT_DEDUP_WINDOW};
pub use classify::{WARNING_BAND_C, classify};
pub use engine::{EXCURSION_TEMP_C, ScenarioEngine, SimulatorConfig, SimulatorResult};
pub use ingest::{IngestError, ReadingIngest};
pub use recovery::schedule;
pub use stats::{FleetStats, SimulatorStats};
