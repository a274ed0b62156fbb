//! 设备 CRUD handlers
//!
//! 提供设备资源的增删改查接口：
//! - GET /devices - 列出设备（可按状态/启用过滤）
//! - POST /devices - 创建设备（外部编号必须唯一）
//! - GET /devices/{id} - 获取设备详情
//! - PUT /devices/{id} - 部分更新设备
//! - GET /devices/{id}/readings - 查询设备读数
//!
//! 路径参数一律使用内部行 id；外部设备编号只在场景触发和
//! 读数上报的请求体里出现。

use crate::AppState;
use crate::utils::response::{
    bad_request_error, device_to_dto, not_found_error, reading_to_dto, storage_error,
};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{
    ApiResponse, CreateDeviceRequest, DeviceDto, DevicesQuery, ReadingDto, ReadingsQuery,
    UpdateDeviceRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coldwatch_storage::{DeviceFilter, DeviceRecord, DeviceUpdate, ReadingFilter};
use domain::{DeviceStatus, ReadingStatus};
use uuid::Uuid;

/// 新设备的缺省电量（%）。
const DEFAULT_BATTERY: i32 = 100;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// 解析查询参数里的设备状态字符串。
fn parse_device_status(value: Option<&str>) -> Result<Option<DeviceStatus>, Response> {
    match value {
        Some(value) => DeviceStatus::parse(value)
            .map(Some)
            .ok_or_else(|| bad_request_error(format!("unknown status: {value}"))),
        None => Ok(None),
    }
}

/// 列出设备
pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<DevicesQuery>,
) -> Response {
    let status = match parse_device_status(query.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let filter = DeviceFilter {
        status,
        is_active: query.active,
    };
    match state.device_store.list_devices(&filter).await {
        Ok(items) => {
            let data: Vec<DeviceDto> = items.into_iter().map(device_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建设备
///
/// 外部设备编号必须唯一；阈值成对给出时要求 min < max。
/// 新设备初始为在线、启用、满电。
pub async fn create_device(
    State(state): State<AppState>,
    Json(req): Json<CreateDeviceRequest>,
) -> Response {
    let device_id = match normalize_required(req.device_id, "deviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let location = match normalize_required(req.location, "location") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let (Some(min), Some(max)) = (req.min_temp, req.max_temp) {
        if min >= max {
            return bad_request_error("minTemp must be below maxTemp");
        }
    }
    match state.device_store.find_by_device_id(&device_id).await {
        Ok(Some(_)) => return bad_request_error(format!("device {device_id} already exists")),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let now = now_epoch_ms();
    let record = DeviceRecord {
        id: Uuid::new_v4().to_string(),
        device_id,
        name,
        location,
        latitude: req.latitude,
        longitude: req.longitude,
        min_temp: req.min_temp,
        max_temp: req.max_temp,
        battery: req.battery.unwrap_or(DEFAULT_BATTERY),
        status: DeviceStatus::Online,
        is_active: true,
        created_at_ms: now,
        updated_at_ms: now,
    };
    match state.device_store.create_device(record).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(device_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 获取设备详情
pub async fn get_device(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.device_store.find_device(&id).await {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(device_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 更新设备
///
/// 部分更新：缺省字段保持原值，至少需要提供一个更新字段。
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDeviceRequest>,
) -> Response {
    let name = match normalize_optional(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let location = match normalize_optional(req.location, "location") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let status = match parse_device_status(req.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let update = DeviceUpdate {
        name,
        location,
        latitude: req.latitude,
        longitude: req.longitude,
        min_temp: req.min_temp,
        max_temp: req.max_temp,
        battery: req.battery,
        status,
        is_active: req.is_active,
    };
    if update.name.is_none()
        && update.location.is_none()
        && update.latitude.is_none()
        && update.longitude.is_none()
        && update.min_temp.is_none()
        && update.max_temp.is_none()
        && update.battery.is_none()
        && update.status.is_none()
        && update.is_active.is_none()
    {
        return bad_request_error("empty update");
    }
    match state.device_store.update_device(&id, update).await {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(device_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 查询设备读数（时间倒序）
pub async fn list_device_readings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReadingsQuery>,
) -> Response {
    match state.device_store.find_device(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    }
    let status = match query.status.as_deref() {
        Some(value) => match ReadingStatus::parse(value) {
            Some(status) => Some(status),
            None => return bad_request_error(format!("unknown status: {value}")),
        },
        None => None,
    };
    let filter = ReadingFilter {
        device_id: Some(id),
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
