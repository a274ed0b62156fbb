//! # Coldwatch Storage 模块
//!
//! 本模块提供统一的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 该模块采用分层架构，遵循以下原则：
//!
//! 1. **接口抽象层** (`traits.rs`)：定义设备/读数/告警存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：定义存储相关的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 5. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!
//! ## 核心特性
//!
//! - **类型安全**：状态以 domain 枚举在内存中流转，仅在边界转为字符串
//! - **异步支持**：基于 Tokio 的异步 I/O，支持高并发场景
//! - **可扩展性**：通过 Trait 接口支持多种存储后端
//!
//! ## 模块说明
//!
//! - [`models`]：数据模型定义（设备、读数、告警及其更新/过滤结构）
//! - [`traits`]：存储接口定义（CRUD + 批量状态更新 + 窗口查询）
//! - [`error`]：存储错误类型定义
//! - [`connection`]：PostgreSQL 连接池管理
//! - [`in_memory`]：内存存储实现
//!   - 使用 `RwLock<HashMap>` / `RwLock<Vec>` 提供线程安全的内存存储
//!   - 适用于单元测试、集成测试和本地演示
//! - [`postgres`]：PostgreSQL 存储实现
//!   - 使用 sqlx 提供类型安全的数据库访问
//!   - 所有 SQL 查询使用参数化，防止 SQL 注入
//!   - 生产环境推荐使用
//!
//! ## 设计约束
//!
//! - **禁止直接 SQL**：Handler 层禁止直接写 SQL，统一通过 storage 层
//! - **调用方构造记录**：id 与时间戳由调用方生成，存储层不持有时钟
//!   （部分更新的 updated_at_ms 刷新除外）
//! - **读数不可变**：ReadingStore 没有更新接口；历史读数的 status
//!   只是写入时的分类快照，权威判断需重新分类
//!
//! ## 已知竞态
//!
//! AlertStore 的 find_recent + create_alert 组合构成告警去重门。
//! 两者之间没有锁或唯一约束：并发触发同一 (device, type) 告警时，
//! 两次检查都可能在任一创建提交前通过，产生重复告警。告警是面向
//! 运维的提示信息，这里接受该竞态。

// 模块导出：将子模块的内容导出到 crate 根目录
pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

// 导出常用类型到 crate 根目录，方便外部引用
pub use connection::*;
pub use error::*;
pub use models::*;
pub use traits::*;

// 导出内存存储实现类型
pub use in_memory::{InMemoryAlertStore, InMemoryDeviceStore, InMemoryReadingStore};

// 导出 PostgreSQL 存储实现类型
pub use postgres::{PgAlertStore, PgDeviceStore, PgReadingStore};
