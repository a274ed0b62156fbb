//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 设备管理：/devices/*
//! - 读数查询与上报：/readings
//! - 告警查询与处理：/alerts/*
//! - 模拟场景与统计：/simulator/*
//! - 实时推送（SSE）：/realtime/events
//! - 指标快照：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/devices", get(list_devices).post(create_device))
        .route("/devices/:id", get(get_device).put(update_device))
        .route("/devices/:id/readings", get(list_device_readings))
        .route("/readings", get(list_readings).post(create_reading))
        .route("/alerts", get(list_alerts))
        .route("/alerts/:id/read", post(mark_alert_read))
        .route("/alerts/:id/resolve", post(resolve_alert))
        .route("/simulator/excursion", post(trigger_excursion))
        .route("/simulator/low-battery", post(simulate_low_battery))
        .route("/simulator/offline", post(take_device_offline))
        .route("/simulator/power-outage", post(simulate_power_outage))
        .route("/simulator/batch-arrival", post(simulate_batch_arrival))
        .route("/simulator/return-to-normal", post(return_to_normal))
        .route("/simulator/stats", get(get_simulator_stats))
        .route("/realtime/events", get(realtime_events))
        .route("/metrics", get(get_metrics))
}

#[cfg(test)]
mod tests {
    use super::create_api_router;
    use crate::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use coldwatch_storage::{InMemoryAlertStore, InMemoryDeviceStore, InMemoryReadingStore};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::assemble(
            Arc::new(InMemoryDeviceStore::new()),
            Arc::new(InMemoryReadingStore::new()),
            Arc::new(InMemoryAlertStore::new()),
            Duration::from_secs(300),
            Duration::from_millis(50),
        )
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let app = create_api_router().with_state(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn device_create_then_get_roundtrip() {
        let app = create_api_router().with_state(test_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/devices",
                serde_json::json!({
                    "deviceId": "FRZ-001",
                    "name": "Freezer 1",
                    "location": "Warehouse A",
                    "minTemp": 2.0,
                    "maxTemp": 8.0
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["success"], true);
        assert_eq!(created["data"]["status"], "online");
        let id = created["data"]["id"].as_str().expect("id").to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/devices/{id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["data"]["deviceId"], "FRZ-001");

        // 重复的外部编号被拒绝
        let response = app
            .oneshot(json_request(
                "POST",
                "/devices",
                serde_json::json!({
                    "deviceId": "FRZ-001",
                    "name": "Freezer 1 again",
                    "location": "Warehouse A"
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reading_ingest_classifies_fresh() {
        let app = create_api_router().with_state(test_state());
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/devices",
                serde_json::json!({
                    "deviceId": "FRZ-001",
                    "name": "Freezer 1",
                    "location": "Warehouse A",
                    "minTemp": 2.0,
                    "maxTemp": 8.0
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        // 12.0°C 距上界 4°C，超出 2°C 分界带，判 critical
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/readings",
                serde_json::json!({ "deviceId": "FRZ-001", "temperature": 12.0 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "critical");

        // 未知设备编号映射 404
        let response = app
            .oneshot(json_request(
                "POST",
                "/readings",
                serde_json::json!({ "deviceId": "FRZ-404", "temperature": 5.0 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn scenario_failure_is_still_http_200() {
        let app = create_api_router().with_state(test_state());
        let response = app
            .oneshot(json_request(
                "POST",
                "/simulator/excursion",
                serde_json::json!({ "deviceId": "FRZ-404" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["success"], false);
        assert_eq!(
            body["data"]["affectedDevices"].as_array().expect("array").len(),
            0
        );
    }

    #[tokio::test]
    async fn stats_snapshot_on_empty_fleet_is_all_zero() {
        let app = create_api_router().with_state(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/simulator/stats")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["totalDevices"], 0);
        assert_eq!(body["data"]["readingsLast24h"], 0);
    }
}
