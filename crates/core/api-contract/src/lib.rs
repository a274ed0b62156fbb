//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 设备创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    pub device_id: String,
    pub name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub battery: Option<i32>,
}

/// 设备更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub battery: Option<i32>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
}

/// 设备返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub id: String,
    pub device_id: String,
    pub name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub battery: i32,
    pub status: String,
    pub is_active: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// 设备列表查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesQuery {
    pub status: Option<String>,
    pub active: Option<bool>,
}

/// 读数上报请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    pub device_id: String,
    pub temperature: f64,
    pub battery: Option<i32>,
    pub timestamp: Option<i64>,
}

/// 读数返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingDto {
    pub id: String,
    pub device_id: String,
    pub temperature: f64,
    pub battery: Option<i32>,
    pub status: String,
    pub timestamp: i64,
}

/// 读数列表查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingsQuery {
    pub status: Option<String>,
    pub since: Option<i64>,
    pub limit: Option<i64>,
}

/// 告警返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDto {
    pub id: String,
    pub device_id: String,
    pub alert_type: String,
    pub severity: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub is_resolved: bool,
    pub resolved_at_ms: Option<i64>,
    pub resolved_by: Option<String>,
    pub created_at_ms: i64,
}

/// 告警列表查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsQuery {
    pub unresolved_only: Option<bool>,
    pub limit: Option<i64>,
}

/// 告警处理请求体（标记解决时携带操作者）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveAlertRequest {
    pub resolved_by: Option<String>,
}

/// 场景触发请求体。
///
/// `deviceId` 缺省时由引擎随机选取符合前置条件的设备。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    pub device_id: Option<String>,
}

/// 场景执行结果返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorResultDto {
    pub success: bool,
    pub message: String,
    pub affected_devices: Vec<DeviceDto>,
}

/// 车队统计快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorStatsDto {
    pub total_devices: u64,
    pub online_devices: u64,
    pub offline_devices: u64,
    pub low_battery_devices: u64,
    pub critical_devices_last_hour: u64,
    pub readings_last_24h: u64,
    pub alerts_last_24h: u64,
}

/// 实时推送查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeQuery {
    pub device_id: Option<String>,
}

/// Telemetry 指标快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub readings_created: u64,
    pub alerts_created: u64,
    pub alerts_suppressed: u64,
    pub scenarios_triggered: u64,
    pub scenario_failures: u64,
    pub events_published: u64,
    pub recoveries_run: u64,
    pub heartbeats_sent: u64,
}
