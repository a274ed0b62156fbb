//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入攻击
//! 2. **连接池管理**：使用连接池复用数据库连接，提高性能
//! 3. **状态字符串**：设备/读数/告警状态以规范小写字符串落库，
//!    读取时经 domain 枚举解析，非法值视为存储错误
//!
//! ## 包含的实现
//!
//! - **DeviceStore** (`device.rs`)：设备存储，支持批量状态更新
//! - **ReadingStore** (`reading.rs`)：读数存储，只增不改
//! - **AlertStore** (`alert.rs`)：告警存储，支持去重查询和已读/解决标记
//!
//! ## 数据库模式要求
//!
//! 本模块依赖以下数据库表（见仓库根目录 migrations/）：
//!
//! - `devices`：设备表（id, device_id, name, location, latitude, longitude,
//!   min_temp, max_temp, battery, status, is_active, created_at_ms, updated_at_ms）
//! - `readings`：读数表（id, device_id, temperature, battery, status, ts_ms）
//! - `alerts`：告警表（id, device_id, alert_type, severity, title, message,
//!   is_read, is_resolved, resolved_at_ms, resolved_by, created_at_ms）
//!
//! ## 索引
//!
//! - `idx_readings_device_ts`：(device_id, ts_ms desc)，最新读数与按设备查询
//! - `idx_readings_ts`：(ts_ms)，时间窗口计数
//! - `idx_alerts_device_type_created`：(device_id, alert_type, created_at_ms desc)，
//!   去重门查询
//!
//! ## 错误处理
//!
//! 所有存储操作返回 `Result<T, StorageError>`；`sqlx::Error` 自动转换。
//! 返回 `Option<T>` 表示"可能不存在"（查询、更新）。

// 导出各个 PostgreSQL 存储实现
pub mod alert;
pub mod device;
pub mod reading;

// 导出到 crate 根目录，方便外部引用
pub use alert::*;
pub use device::*;
pub use reading::*;
