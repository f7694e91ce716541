//! Admin API 记录 CRUD 操作
//!
//! 所有写入走 RecordService：先校验再落库，成功后失效相关视图缓存。

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{DashboardService, RecordService};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_dashboard, json_response, parse_collection};
use super::types::{CreatedRecord, DeleteRecordQuery, ListRecordsQuery};

/// 去重后的 campaign 列表（表单下拉框）
pub async fn get_campaigns(dashboard: web::Data<Arc<DashboardService>>) -> impl Responder {
    trace!("Admin API: request to list campaign names");
    api_result(dashboard.campaign_names().await)
}

pub async fn list_records(
    path: web::Path<String>,
    query: web::Query<ListRecordsQuery>,
    records: web::Data<Arc<RecordService>>,
) -> impl Responder {
    let kind = match parse_collection(&path) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    trace!(
        "Admin API: list {} (include_deleted={})",
        kind, query.include_deleted
    );
    api_result(records.list(kind, query.include_deleted).await)
}

pub async fn get_record(
    path: web::Path<(String, String)>,
    records: web::Data<Arc<RecordService>>,
) -> impl Responder {
    let (collection, id) = path.into_inner();
    let kind = match parse_collection(&collection) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    api_result(records.get(kind, &id).await)
}

pub async fn create_record(
    path: web::Path<String>,
    body: web::Json<Value>,
    records: web::Data<Arc<RecordService>>,
) -> impl Responder {
    let kind = match parse_collection(&path) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };

    match records.create(kind, body.into_inner()).await {
        Ok(id) => {
            info!("Admin API: created {} record {}", kind, id);
            json_response(
                StatusCode::CREATED,
                ErrorCode::Success,
                "Created",
                Some(CreatedRecord { id }),
            )
        }
        Err(e) => error_from_dashboard(&e),
    }
}

pub async fn update_record(
    path: web::Path<(String, String)>,
    body: web::Json<Value>,
    records: web::Data<Arc<RecordService>>,
) -> impl Responder {
    let (collection, id) = path.into_inner();
    let kind = match parse_collection(&collection) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    api_result(records.update(kind, &id, body.into_inner()).await)
}

/// 默认软删除，`?hard=true` 时物理删除
pub async fn delete_record(
    path: web::Path<(String, String)>,
    query: web::Query<DeleteRecordQuery>,
    records: web::Data<Arc<RecordService>>,
) -> impl Responder {
    let (collection, id) = path.into_inner();
    let kind = match parse_collection(&collection) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };

    let result = if query.hard {
        records.hard_delete(kind, &id).await
    } else {
        records.soft_delete(kind, &id).await
    };
    api_result(result)
}

pub async fn restore_record(
    path: web::Path<(String, String)>,
    records: web::Data<Arc<RecordService>>,
) -> impl Responder {
    let (collection, id) = path.into_inner();
    let kind = match parse_collection(&collection) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    api_result(records.restore(kind, &id).await)
}

/// JSON body 解析失败时的统一响应
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let resp: HttpResponse = super::helpers::error_response(
        StatusCode::BAD_REQUEST,
        ErrorCode::BadRequest,
        &format!("Invalid JSON body: {}", err),
    );
    actix_web::error::InternalError::from_response(err, resp).into()
}

/// 查询参数解析失败时同样返回统一的 `{code, message, data}` 结构
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let resp: HttpResponse = super::helpers::error_response(
        StatusCode::BAD_REQUEST,
        ErrorCode::BadRequest,
        &format!("Invalid query string: {}", err),
    );
    actix_web::error::InternalError::from_response(err, resp).into()
}
