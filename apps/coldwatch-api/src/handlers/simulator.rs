//! 模拟场景 handlers
//!
//! 六个场景入口加统计快照：
//! - POST /simulator/excursion { deviceId? }
//! - POST /simulator/low-battery { deviceId? }
//! - POST /simulator/offline { deviceId? }
//! - POST /simulator/power-outage
//! - POST /simulator/batch-arrival
//! - POST /simulator/return-to-normal
//! - GET  /simulator/stats
//!
//! 场景从不抛错：失败也是 200，success/message 携带结果。
//! deviceId 缺省时由引擎随机选取符合前置条件的设备。

use crate::AppState;
use crate::utils::response::{simulator_result_to_dto, stats_to_dto};
use api_contract::{ApiResponse, ScenarioRequest};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coldwatch_simulator::SimulatorResult;

fn scenario_response(result: SimulatorResult) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::success(simulator_result_to_dto(result))),
    )
        .into_response()
}

fn target(body: Option<Json<ScenarioRequest>>) -> Option<String> {
    body.and_then(|Json(req)| req.device_id)
}

/// 触发温度越界
pub async fn trigger_excursion(
    State(state): State<AppState>,
    body: Option<Json<ScenarioRequest>>,
) -> Response {
    let device_id = target(body);
    scenario_response(state.engine.trigger_excursion(device_id.as_deref()).await)
}

/// 模拟低电量
pub async fn simulate_low_battery(
    State(state): State<AppState>,
    body: Option<Json<ScenarioRequest>>,
) -> Response {
    let device_id = target(body);
    scenario_response(state.engine.simulate_low_battery(device_id.as_deref()).await)
}

/// 使设备离线
pub async fn take_device_offline(
    State(state): State<AppState>,
    body: Option<Json<ScenarioRequest>>,
) -> Response {
    let device_id = target(body);
    scenario_response(state.engine.take_device_offline(device_id.as_deref()).await)
}

/// 模拟全场断电（延迟后自动恢复）
pub async fn simulate_power_outage(State(state): State<AppState>) -> Response {
    scenario_response(state.engine.simulate_power_outage().await)
}

/// 模拟批量到货
pub async fn simulate_batch_arrival(State(state): State<AppState>) -> Response {
    scenario_response(state.engine.simulate_batch_arrival().await)
}

/// 恢复正常
pub async fn return_to_normal(State(state): State<AppState>) -> Response {
    scenario_response(state.engine.return_to_normal().await)
}

/// 车队统计快照（现算，存储失败降级全零）
pub async fn get_simulator_stats(State(state): State<AppState>) -> Response {
    let stats = state.stats.snapshot().await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(stats_to_dto(stats))),
    )
        .into_response()
}
