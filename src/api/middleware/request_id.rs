//! Request ID middleware
//!
//! 为每个请求生成唯一的 UUID，注入到 tracing span 中，方便日志关联追踪；
//! 同时记录请求耗时。

use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
};
use std::time::Instant;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

/// 请求 ID 类型，可从 request extensions 中提取
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 配合 `actix_web::middleware::from_fn` 使用
pub async fn request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.path(),
    );

    async move {
        let start = Instant::now();
        let mut response = next.call(req).await?;
        debug!(
            status = response.status().as_u16(),
            "Request completed in {:?}",
            start.elapsed()
        );

        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
        }
        Ok(response)
    }
    .instrument(span)
    .await
}
