//! 告警 handlers
//!
//! - GET /alerts - 列出告警（可只看未解决）
//! - POST /alerts/{id}/read - 标记已读
//! - POST /alerts/{id}/resolve - 标记已解决（可携带操作者）
//!
//! 告警的创建只发生在核心的去重门里，这里只有读取与处理。

use crate::AppState;
use crate::utils::response::{alert_to_dto, not_found_error, storage_error};
use api_contract::{AlertDto, AlertsQuery, ApiResponse, ResolveAlertRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coldwatch_storage::AlertFilter;

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// 列出告警（创建时间倒序）
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Response {
    let filter = AlertFilter {
        unresolved_only: query.unresolved_only.unwrap_or(false),
        limit: query.limit.map(|limit| limit.max(0) as usize),
    };
    match state.alert_store.list_alerts(&filter).await {
        Ok(items) => {
            let data: Vec<AlertDto> = items.into_iter().map(alert_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 标记告警已读
pub async fn mark_alert_read(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.alert_store.mark_read(&id).await {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(alert_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 标记告警已解决
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ResolveAlertRequest>>,
) -> Response {
    let resolved_by = body.and_then(|Json(req)| req.resolved_by);
    match state
        .alert_store
        .resolve(&id, resolved_by.as_deref(), now_epoch_ms())
        .await
    {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(alert_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
