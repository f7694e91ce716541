//! 看板只读接口 `/api/v1/dashboard`

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use std::sync::Arc;
use tracing::trace;

use crate::services::DashboardService;

use super::admin::{
    DateRangeQuery, ErrorCode, ProjectionQuery, SearchQuery, api_result, error_from_dashboard,
    error_response, parse_date_range, query_error_handler,
};

pub struct DashboardApi;

impl DashboardApi {
    /// 全部区块，`from` / `to` 只作用于 overview
    pub async fn snapshot(
        query: web::Query<DateRangeQuery>,
        service: web::Data<Arc<DashboardService>>,
    ) -> impl Responder {
        let range = match parse_date_range(&query) {
            Ok(range) => range,
            Err(resp) => return resp,
        };
        trace!("Dashboard API: snapshot {:?}", range);
        api_result(service.dashboard(range).await)
    }

    pub async fn overview(
        query: web::Query<DateRangeQuery>,
        service: web::Data<Arc<DashboardService>>,
    ) -> impl Responder {
        let range = match parse_date_range(&query) {
            Ok(range) => range,
            Err(resp) => return resp,
        };
        api_result(service.overview(range).await)
    }

    pub async fn campaigns(service: web::Data<Arc<DashboardService>>) -> impl Responder {
        api_result(service.campaign_performance().await)
    }

    pub async fn calls(service: web::Data<Arc<DashboardService>>) -> impl Responder {
        api_result(service.call_analytics().await)
    }

    pub async fn funnel(service: web::Data<Arc<DashboardService>>) -> impl Responder {
        api_result(service.funnel().await)
    }

    pub async fn forecast(service: web::Data<Arc<DashboardService>>) -> impl Responder {
        api_result(service.forecast().await)
    }

    pub async fn projection(
        query: web::Query<ProjectionQuery>,
        service: web::Data<Arc<DashboardService>>,
    ) -> impl Responder {
        let Some(target) = query.target_clients else {
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                "Missing 'target_clients' query parameter",
            );
        };

        match service.forecast().await {
            Ok(state) if !state.is_enabled() => error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::ForecastLocked,
                "Forecast is locked until enough history is available",
            ),
            Ok(_) => api_result(service.projection(target).await),
            Err(e) => error_from_dashboard(&e),
        }
    }

    pub async fn search(
        query: web::Query<SearchQuery>,
        service: web::Data<Arc<DashboardService>>,
    ) -> impl Responder {
        trace!("Dashboard API: search '{}'", query.q);
        api_result(service.search(&query.q).await)
    }
}

/// Dashboard 路由配置
pub fn dashboard_routes() -> actix_web::Scope {
    web::scope("/dashboard")
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("", web::get().to(DashboardApi::snapshot))
        .route("/", web::get().to(DashboardApi::snapshot))
        .route("/overview", web::get().to(DashboardApi::overview))
        .route("/campaigns", web::get().to(DashboardApi::campaigns))
        .route("/calls", web::get().to(DashboardApi::calls))
        .route("/funnel", web::get().to(DashboardApi::funnel))
        .route("/forecast", web::get().to(DashboardApi::forecast))
        .route("/forecast/projection", web::get().to(DashboardApi::projection))
        .route("/search", web::get().to(DashboardApi::search))
}
