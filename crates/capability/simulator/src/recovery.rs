//! 定时恢复调度
//!
//! 延迟执行一个一次性动作，与调用方生命周期解耦。
//! 不持久化：延迟期间进程重启，动作即丢失（已记录的限制）；
//! 也没有取消原语，调度之后只能等它跑完。

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 在 delay 之后执行一次 action。
///
/// 立即返回；动作在独立任务中运行，其失败由动作自身记录日志，
/// 不回传给调度方。
pub fn schedule<F, Fut>(delay: Duration, action: F) -> JoinHandle<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        action().await;
    })
}
