//! 数据库连接管理
//!
//! 建立 Postgres 连接池。三个 Pg 存储共享同一个池：设备/读数/
//! 告警的访问都从这里取连接。获取连接设置了上限时间，存储慢时
//! 调用方拿到的是超时错误而不是无限等待（统计门面据此降级）。

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// 连接池上限。
const MAX_CONNECTIONS: u32 = 8;

/// 单次获取连接的等待上限。
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// 从数据库 URL 建立 Postgres 连接池。
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;
    Ok(pool)
}
