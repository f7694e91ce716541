//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::DashboardError;
use crate::storage::models::parse_day;
use crate::storage::{DateRange, RecordKind};

use super::error_code::ErrorCode;
use super::types::{ApiResponse, DateRangeQuery};

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 DashboardError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_dashboard(err: &DashboardError) -> HttpResponse {
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 DashboardError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<DashboardError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_dashboard(&e.into()),
    }
}

/// 解析路径中的集合名（`ad_spend` / `call_inquiry`）
pub fn parse_collection(collection: &str) -> Result<RecordKind, HttpResponse> {
    collection.parse::<RecordKind>().map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::UnknownCollection,
            &format!(
                "Unknown collection '{}', expected ad_spend or call_inquiry",
                collection
            ),
        )
    })
}

/// 解析 `from` / `to` 查询参数，格式错误返回 400
pub fn parse_date_range(query: &DateRangeQuery) -> Result<DateRange, HttpResponse> {
    let parse = |value: &Option<String>, name: &str| match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_day(s).map(Some).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidDateFormat,
                &format!("Invalid '{}' date '{}', expected YYYY-MM-DD", name, s),
            )
        }),
    };

    Ok(DateRange::new(
        parse(&query.from, "from")?,
        parse(&query.to, "to")?,
    ))
}
