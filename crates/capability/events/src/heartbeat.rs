//! PING 心跳发布任务
//!
//! 独立于任何场景，按固定间隔向 PING 主题发布时间戳，
//! 订阅方据此验证推送链路存活。

use crate::bus::EventBus;
use crate::messages::{EventMessage, Heartbeat};
use crate::topics;
use coldwatch_telemetry::record_heartbeat_sent;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// 启动心跳后台任务。
///
/// 任务与调用方生命周期解耦，随进程退出而结束；返回的句柄
/// 仅供需要时终止。
pub fn spawn_heartbeat(bus: EventBus, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // interval 的首次 tick 立即完成，跳过以保证第一拍在一个周期后
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let ts_ms = now_epoch_ms();
            let delivered = bus.publish(topics::PING, EventMessage::Ping(Heartbeat { ts_ms }));
            record_heartbeat_sent();
            debug!(target: "coldwatch.events", ts_ms, delivered, "heartbeat_published");
        }
    })
}
