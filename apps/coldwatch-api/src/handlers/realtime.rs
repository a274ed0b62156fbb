//! 实时推送 handler（SSE）
//!
//! - GET /realtime/events?deviceId=
//!
//! 订阅总线并把事件转成 SSE 消息推给连接方。按设备过滤靠订阅
//! `TEMPERATURE_UPDATES_<设备编号>` 主题实现（发布方双发布约定），
//! 总线本身不做过滤。连接断开时订阅句柄 Drop，注册即刻回收。

use crate::AppState;
use api_contract::RealtimeQuery;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use coldwatch_events::topics;
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::warn;

/// 实时事件流
///
/// 无 deviceId：全局温度 + 状态变更 + 心跳。
/// 有 deviceId：该设备的温度主题替换全局温度主题。
pub async fn realtime_events(
    State(state): State<AppState>,
    Query(query): Query<RealtimeQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let temperature_topic = match query.device_id.as_deref() {
        Some(device_id) => topics::temperature_topic_for(device_id),
        None => topics::TEMPERATURE_UPDATES.to_string(),
    };
    let subscription = state.bus.subscribe(&[
        temperature_topic.as_str(),
        topics::DEVICE_STATUS_CHANGED,
        topics::PING,
    ]);
    let stream = subscription.filter_map(|message| async move {
        match serde_json::to_string(&message) {
            Ok(payload) => Some(Ok(Event::default().event(message.kind()).data(payload))),
            Err(err) => {
                warn!(target: "coldwatch.api", error = %err, "event_serialize_failed");
                None
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
