//! 通用辅助模块
//!
//! - `response`：错误响应构造与 Record -> DTO 转换
//! - 输入验证：去除首尾空格并检查非空，失败返回 bad_request_error

pub mod response;

use axum::response::Response;
use response::bad_request_error;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字段，如果提供则去除空格并检查非空
pub fn normalize_optional(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    match value {
        Some(value) => normalize_required(value, field).map(Some),
        None => Ok(None),
    }
}
