//! 存储层错误类型
//!
//! 统一的存储错误：Postgres 的执行/连接错误与内存实现的锁中毒
//! 都收敛到这里。调用方只依赖可读消息，不区分错误来源——场景
//! 边界和统计门面对所有存储失败一视同仁。

/// 存储操作失败。
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::new(err.to_string())
    }
}
