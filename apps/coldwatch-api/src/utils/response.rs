//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：bad_request_error, not_found_error, storage_error, ingest_error
//! - DTO 转换：device_to_dto, reading_to_dto, alert_to_dto,
//!   simulator_result_to_dto, stats_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - HTTP 状态码与错误码对应
//! - DTO 转换保持 Record 和 DTO 字段一致，状态以规范字符串输出

use api_contract::{
    AlertDto, ApiResponse, DeviceDto, ReadingDto, SimulatorResultDto, SimulatorStatsDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coldwatch_simulator::{IngestError, SimulatorResult, SimulatorStats};
use coldwatch_storage::{AlertRecord, DeviceRecord, ReadingRecord, StorageError};

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 上报管线错误响应：设备不存在映射 404，其余映射 500
pub fn ingest_error(err: IngestError) -> Response {
    match err {
        IngestError::DeviceNotFound(_) => not_found_error(),
        IngestError::Store(err) => storage_error(err),
    }
}

/// DeviceRecord 转 DeviceDto
pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        id: record.id,
        device_id: record.device_id,
        name: record.name,
        location: record.location,
        latitude: record.latitude,
        longitude: record.longitude,
        min_temp: record.min_temp,
        max_temp: record.max_temp,
        battery: record.battery,
        status: record.status.as_str().to_string(),
        is_active: record.is_active,
        created_at_ms: record.created_at_ms,
        updated_at_ms: record.updated_at_ms,
    }
}

/// ReadingRecord 转 ReadingDto
pub fn reading_to_dto(record: ReadingRecord) -> ReadingDto {
    ReadingDto {
        id: record.id,
        device_id: record.device_id,
        temperature: record.temperature,
        battery: record.battery,
        status: record.status.as_str().to_string(),
        timestamp: record.ts_ms,
    }
}

/// AlertRecord 转 AlertDto
pub fn alert_to_dto(record: AlertRecord) -> AlertDto {
    AlertDto {
        id: record.id,
        device_id: record.device_id,
        alert_type: record.alert_type.as_str().to_string(),
        severity: record.severity.as_str().to_string(),
        title: record.title,
        message: record.message,
        is_read: record.is_read,
        is_resolved: record.is_resolved,
        resolved_at_ms: record.resolved_at_ms,
        resolved_by: record.resolved_by,
        created_at_ms: record.created_at_ms,
    }
}

/// SimulatorResult 转 SimulatorResultDto
///
/// 场景失败也走这里：failure 只体现在 success/message 上，
/// HTTP 层始终按 200 返回。
pub fn simulator_result_to_dto(result: SimulatorResult) -> SimulatorResultDto {
    SimulatorResultDto {
        success: result.success,
        message: result.message,
        affected_devices: result
            .affected_devices
            .into_iter()
            .map(device_to_dto)
            .collect(),
    }
}

/// SimulatorStats 转 SimulatorStatsDto
pub fn stats_to_dto(stats: SimulatorStats) -> SimulatorStatsDto {
    SimulatorStatsDto {
        total_devices: stats.total_devices,
        online_devices: stats.online_devices,
        offline_devices: stats.offline_devices,
        low_battery_devices: stats.low_battery_devices,
        critical_devices_last_hour: stats.critical_devices_last_hour,
        readings_last_24h: stats.readings_last_24h,
        alerts_last_24h: stats.alerts_last_24h,
    }
}
