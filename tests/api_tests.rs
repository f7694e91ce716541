//! HTTP API integration tests
//!
//! Full route table over the in-memory repository, without binding a socket.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};

use funnelboard::analytics::{ForecastState, FunnelReport, OverviewStats};
use funnelboard::api::middleware::{REQUEST_ID_HEADER, request_id};
use funnelboard::api::services::AppStartTime;
use funnelboard::api::services::admin::{ApiResponse, CreatedRecord, ErrorCode};
use funnelboard::cache::{MokaViewCache, ViewCache};
use funnelboard::config::CacheConfig;
use funnelboard::runtime::lifetime::startup::StartupContext;
use funnelboard::runtime::modes::configure_app;
use funnelboard::storage::{MemoryStorage, RecordRepository};

fn test_context() -> (StartupContext, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let repo: Arc<dyn RecordRepository> = storage.clone();
    let cache: Arc<dyn ViewCache> = Arc::new(MokaViewCache::new(&CacheConfig::default()));
    (StartupContext::from_parts(repo, cache), storage)
}

macro_rules! test_app {
    ($context:expr) => {{
        let context = $context.clone();
        let started = AppStartTime {
            start_datetime: chrono::Utc::now(),
        };
        test::init_service(
            App::new()
                .wrap(from_fn(request_id))
                .configure(move |cfg| configure_app(cfg, &context, &started)),
        )
        .await
    }};
}

fn ad_payload(date: &str, spend: f64) -> Value {
    json!({
        "date": date,
        "campaign_id": "c1",
        "campaign_name": "Spring Promo",
        "amount_spent": spend,
        "impressions": 1000,
        "results": 10
    })
}

fn call_payload(date: &str, total_calls: u64, wins: u64) -> Value {
    json!({
        "date": date,
        "call_type": "local",
        "language": "english",
        "country_name": "Sri Lanka",
        "iso_code": "LK",
        "dialing_code": "+94",
        "total_calls": total_calls,
        "wins": wins
    })
}

#[actix_web::test]
async fn test_create_then_overview() {
    let (context, _) = test_context();
    let app = test_app!(context);

    let req = TestRequest::post()
        .uri("/admin/v1/records/ad_spend")
        .set_json(ad_payload("2024-01-01", 100.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let body: ApiResponse<CreatedRecord> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::Success as i32);
    assert!(!body.data.unwrap().id.is_empty());

    let req = TestRequest::post()
        .uri("/admin/v1/records/call_inquiry")
        .set_json(call_payload("2024-01-01", 5, 2))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/overview?from=2024-01-01&to=2024-01-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<OverviewStats> = test::read_body_json(resp).await;
    let stats = body.data.unwrap();
    assert_eq!(stats.total_spend, 100.0);
    assert_eq!(stats.total_calls, 5);
    assert_eq!(stats.total_wins, 2);
    assert_eq!(stats.cost_per_client, 50.0);
}

#[actix_web::test]
async fn test_dashboard_snapshot_and_sections() {
    let (context, _) = test_context();
    let app = test_app!(context);

    let req = TestRequest::get().uri("/api/v1/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    let data = body.data.unwrap();
    for section in ["overview", "campaigns", "calls", "funnel", "forecast"] {
        assert!(data.get(section).is_some(), "missing section {section}");
    }

    let req = TestRequest::get().uri("/api/v1/dashboard/funnel").to_request();
    let body: ApiResponse<FunnelReport> =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body.data.unwrap().overall_conversion, 0.0);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/forecast")
        .to_request();
    let body: ApiResponse<ForecastState> =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert!(!body.data.unwrap().is_enabled());

    for uri in ["/api/v1/dashboard/campaigns", "/api/v1/dashboard/calls"] {
        let req = TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_bad_date_parameter_is_rejected() {
    let (context, _) = test_context();
    let app = test_app!(context);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/overview?from=2024-1-1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::InvalidDateFormat as i32);
}

#[actix_web::test]
async fn test_projection_locked_and_missing_target() {
    let (context, _) = test_context();
    let app = test_app!(context);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/forecast/projection")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/forecast/projection?target_clients=10")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::ForecastLocked as i32);
}

#[actix_web::test]
async fn test_malformed_query_uses_error_envelope() {
    let (context, _) = test_context();
    let app = test_app!(context);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/forecast/projection?target_clients=ten")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::BadRequest as i32);
    assert!(body.data.is_none());

    let req = TestRequest::get()
        .uri("/admin/v1/records/ad_spend?include_deleted=maybe")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::BadRequest as i32);
}

#[actix_web::test]
async fn test_unknown_collection_and_unknown_field() {
    let (context, _) = test_context();
    let app = test_app!(context);

    let req = TestRequest::get()
        .uri("/admin/v1/records/links")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::UnknownCollection as i32);

    let mut payload = ad_payload("2024-01-01", 10.0);
    payload["cpc"] = json!(0.4);
    let req = TestRequest::post()
        .uri("/admin/v1/records/ad_spend")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::RecordValidationFailed as i32);

    let req = TestRequest::get().uri("/admin/v1/campaigns").to_request();
    let body: ApiResponse<Vec<Value>> =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body.data.unwrap().is_empty());
}

#[actix_web::test]
async fn test_record_crud_cycle() {
    let (context, _) = test_context();
    let app = test_app!(context);

    let req = TestRequest::post()
        .uri("/admin/v1/records/ad_spend")
        .set_json(ad_payload("2024-02-01", 40.0))
        .to_request();
    let body: ApiResponse<CreatedRecord> =
        test::read_body_json(test::call_service(&app, req).await).await;
    let id = body.data.unwrap().id;
    let record_uri = format!("/admin/v1/records/ad_spend/{}", id);

    let req = TestRequest::put()
        .uri(&record_uri)
        .set_json(json!({ "amount_spent": 55.0 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get().uri(&record_uri).to_request();
    let body: ApiResponse<Value> =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body.data.unwrap()["amount_spent"], json!(55.0));

    // soft delete hides it from the default listing only
    let req = TestRequest::delete().uri(&record_uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri("/admin/v1/records/ad_spend")
        .to_request();
    let body: ApiResponse<Vec<Value>> =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body.data.unwrap().is_empty());

    let req = TestRequest::get()
        .uri("/admin/v1/records/ad_spend?include_deleted=true")
        .to_request();
    let body: ApiResponse<Vec<Value>> =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body.data.unwrap().len(), 1);

    let req = TestRequest::post()
        .uri(&format!("{}/restore", record_uri))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::delete()
        .uri(&format!("{}?hard=true", record_uri))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get().uri(&record_uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::RecordNotFound as i32);
}

#[actix_web::test]
async fn test_health_probes() {
    let (context, storage) = test_context();
    let app = test_app!(context);

    let req = TestRequest::get().uri("/health/live").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = TestRequest::get().uri("/health/ready").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap()["checks"]["storage"]["backend"], "memory");

    storage.set_unavailable(true);
    let req = TestRequest::get().uri("/health/ready").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    let req = TestRequest::get()
        .uri("/api/v1/dashboard/funnel")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
