//! 读数 handlers
//!
//! - GET /readings - 按状态/时间窗口查询读数
//! - POST /readings - 设备上报入口，走完整上报管线
//!   （现算分类 -> 落库 -> 电量刷新 -> 告警门 -> 双发布）

use crate::AppState;
use crate::utils::normalize_required;
use crate::utils::response::{
    bad_request_error, ingest_error, reading_to_dto, storage_error,
};
use api_contract::{ApiResponse, CreateReadingRequest, ReadingDto, ReadingsQuery};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coldwatch_storage::ReadingFilter;
use domain::ReadingStatus;

/// 查询读数（时间倒序）
pub async fn list_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> Response {
    let status = match query.status.as_deref() {
        Some(value) => match ReadingStatus::parse(value) {
            Some(status) => Some(status),
            None => return bad_request_error(format!("unknown status: {value}")),
        },
        None => None,
    };
    let filter = ReadingFilter {
        device_id: None,
        status,
        since_ms: query.since,
        limit: query.limit.map(|limit| limit.max(0) as usize),
    };
    match state.reading_store.list_readings(&filter).await {
        Ok(items) => {
            let data: Vec<ReadingDto> = items.into_iter().map(reading_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 设备上报一条读数
///
/// 请求体携带的是外部设备编号；返回的 status 是管线现算的分类，
/// 与上报方自称的状态无关。
pub async fn create_reading(
    State(state): State<AppState>,
    Json(req): Json<CreateReadingRequest>,
) -> Response {
    let device_id = match normalize_required(req.device_id, "deviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .ingest
        .ingest(&device_id, req.temperature, req.battery, req.timestamp)
        .await
    {
        Ok(reading) => (
            StatusCode::OK,
            Json(ApiResponse::success(reading_to_dto(reading))),
        )
            .into_response(),
        Err(err) => ingest_error(err),
    }
}
