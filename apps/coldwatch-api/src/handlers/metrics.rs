//! Telemetry 指标快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coldwatch_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            readings_created: snapshot.readings_created,
            alerts_created: snapshot.alerts_created,
            alerts_suppressed: snapshot.alerts_suppressed,
            scenarios_triggered: snapshot.scenarios_triggered,
            scenario_failures: snapshot.scenario_failures,
            events_published: snapshot.events_published,
            recoveries_run: snapshot.recoveries_run,
            heartbeats_sent: snapshot.heartbeats_sent,
        })),
    )
        .into_response()
}
