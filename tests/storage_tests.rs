//! Storage backend tests
//!
//! Tests for SeaOrmStorage using temporary SQLite databases.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use migration::entities::ad_spend;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use tempfile::TempDir;

use funnelboard::cache::NullViewCache;
use funnelboard::errors::DashboardError;
use funnelboard::services::{DashboardService, RecordService, StoredRecord};
use funnelboard::storage::backend::retry::RetryPolicy;
use funnelboard::storage::{
    AdSpendRecord, CallInquiryRecord, CallType, DateRange, Language, RecordKind, RecordQuery,
    RecordRepository, SeaOrmStorage,
};

/// Test-local accessor: `StoredRecord` no longer exposes `is_deleted`, so
/// delegate to the per-variant record's own method.
trait StoredRecordExt {
    fn is_deleted(&self) -> bool;
}

impl StoredRecordExt for StoredRecord {
    fn is_deleted(&self) -> bool {
        match self {
            StoredRecord::AdSpend(r) => r.is_deleted(),
            StoredRecord::CallInquiry(r) => r.is_deleted(),
        }
    }
}

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::connect(&db_url, "sqlite", 1, RetryPolicy::none())
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn ad_record(id: &str, date: &str, campaign_id: &str, name: &str, spend: f64) -> AdSpendRecord {
    AdSpendRecord {
        id: id.to_string(),
        date: day(date),
        campaign_id: campaign_id.to_string(),
        campaign_name: name.to_string(),
        amount_spent: spend,
        impressions: 1000,
        reach: 600,
        link_clicks: 40,
        results: 10,
        glitch_noted: false,
        glitch_details: None,
        created_at: Utc::now(),
        deleted_at: None,
    }
}

fn call_record(id: &str, date: &str, total_calls: u64, wins: u64) -> CallInquiryRecord {
    CallInquiryRecord {
        id: id.to_string(),
        date: day(date),
        call_type: CallType::Whatsapp,
        language: Language::Sinhala,
        country_name: "Sri Lanka".to_string(),
        iso_code: "LK".to_string(),
        dialing_code: "+94".to_string(),
        total_calls,
        quotation_sent: 1,
        wins,
        created_at: Utc::now(),
        deleted_at: None,
    }
}

#[tokio::test]
async fn test_insert_and_get_round_trip() {
    let (storage, _dir) = create_temp_storage().await;

    let mut ad = ad_record("a1", "2024-01-05", "c1", "Spring", 12.5);
    ad.glitch_noted = true;
    ad.glitch_details = Some("pixel outage".to_string());
    storage.insert_ad_spend(&ad).await.unwrap();

    let loaded = storage.get_ad_spend("a1").await.unwrap().unwrap();
    assert_eq!(loaded.date, ad.date);
    assert_eq!(loaded.amount_spent, 12.5);
    assert_eq!(loaded.glitch_details.as_deref(), Some("pixel outage"));
    assert!(storage.get_ad_spend("missing").await.unwrap().is_none());

    storage
        .insert_call_inquiry(&call_record("k1", "2024-01-05", 7, 3))
        .await
        .unwrap();
    let call = storage.get_call_inquiry("k1").await.unwrap().unwrap();
    assert_eq!(call.call_type, CallType::Whatsapp);
    assert_eq!(call.language, Language::Sinhala);
    assert_eq!(call.total_calls, 7);
}

#[tokio::test]
async fn test_fetch_filters_by_range_and_deleted() {
    let (storage, _dir) = create_temp_storage().await;
    for (id, date) in [("a1", "2024-01-01"), ("a2", "2024-01-15"), ("a3", "2024-02-01")] {
        storage
            .insert_ad_spend(&ad_record(id, date, "c1", "Spring", 10.0))
            .await
            .unwrap();
    }
    storage
        .set_deleted_at(RecordKind::AdSpend, "a2", Some(Utc::now()))
        .await
        .unwrap();

    let active = storage.fetch_ad_spend(RecordQuery::active()).await.unwrap();
    let ids: Vec<&str> = active.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a3", "a1"]);

    let all = storage
        .fetch_ad_spend(RecordQuery::with_deleted())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let january = RecordQuery::in_range(DateRange::new(
        Some(day("2024-01-01")),
        Some(day("2024-01-31")),
    ));
    let rows = storage.fetch_ad_spend(january).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "a1");
}

#[tokio::test]
async fn test_mutations_on_missing_ids_are_not_found() {
    let (storage, _dir) = create_temp_storage().await;

    let ghost = ad_record("ghost", "2024-01-01", "c1", "Spring", 1.0);
    assert!(matches!(
        storage.update_ad_spend(&ghost).await,
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        storage
            .set_deleted_at(RecordKind::CallInquiry, "ghost", None)
            .await,
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        storage.hard_delete(RecordKind::AdSpend, "ghost").await,
        Err(DashboardError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_campaign_names_are_deduplicated() {
    let (storage, _dir) = create_temp_storage().await;
    storage
        .insert_ad_spend(&ad_record("a1", "2024-01-01", "c1", "Old name", 1.0))
        .await
        .unwrap();
    storage
        .insert_ad_spend(&ad_record("a2", "2024-01-09", "c1", "New name", 1.0))
        .await
        .unwrap();
    storage
        .insert_ad_spend(&ad_record("a3", "2024-01-02", "c2", "Autumn", 1.0))
        .await
        .unwrap();

    let campaigns = storage.fetch_all_campaign_names().await.unwrap();
    let names: Vec<(&str, &str)> = campaigns
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    assert_eq!(names, vec![("c2", "Autumn"), ("c1", "New name")]);
}

#[tokio::test]
async fn test_corrupt_stored_date_is_computation_error() {
    let (storage, _dir) = create_temp_storage().await;

    ad_spend::ActiveModel {
        id: Set("bad".to_string()),
        date: Set("01/02/2024".to_string()),
        campaign_id: Set("c1".to_string()),
        campaign_name: Set("Spring".to_string()),
        amount_spent: Set(1.0),
        impressions: Set(1),
        reach: Set(1),
        link_clicks: Set(1),
        results: Set(1),
        glitch_noted: Set(false),
        glitch_details: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
    }
    .insert(storage.get_db())
    .await
    .unwrap();

    assert!(matches!(
        storage.fetch_ad_spend(RecordQuery::active()).await,
        Err(DashboardError::Computation(_))
    ));
}

#[tokio::test]
async fn test_corrupt_stored_numbers_are_computation_error() {
    let (storage, _dir) = create_temp_storage().await;

    ad_spend::ActiveModel {
        id: Set("negative".to_string()),
        date: Set("2024-01-02".to_string()),
        campaign_id: Set("c1".to_string()),
        campaign_name: Set("Spring".to_string()),
        amount_spent: Set(-50.0),
        impressions: Set(-1000),
        reach: Set(0),
        link_clicks: Set(0),
        results: Set(-3),
        glitch_noted: Set(false),
        glitch_details: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
    }
    .insert(storage.get_db())
    .await
    .unwrap();

    assert!(matches!(
        storage.fetch_ad_spend(RecordQuery::active()).await,
        Err(DashboardError::Computation(_))
    ));
    assert!(matches!(
        storage.get_ad_spend("negative").await,
        Err(DashboardError::Computation(_))
    ));
}

#[tokio::test]
async fn test_record_lifecycle_through_services() {
    let (storage, _dir) = create_temp_storage().await;
    let repo: Arc<dyn RecordRepository> = Arc::new(storage);
    let records = RecordService::new(repo.clone(), Arc::new(NullViewCache));
    let dashboard = DashboardService::new(repo.clone(), Arc::new(NullViewCache));

    let id = records
        .create(
            RecordKind::CallInquiry,
            json!({
                "date": "2024-04-02",
                "call_type": "local",
                "language": "english",
                "country_name": "Sri Lanka",
                "iso_code": "LK",
                "dialing_code": "+94",
                "total_calls": 8,
                "wins": 3
            }),
        )
        .await
        .unwrap();

    records
        .update(RecordKind::CallInquiry, &id, json!({ "wins": 4 }))
        .await
        .unwrap();
    match records.get(RecordKind::CallInquiry, &id).await.unwrap() {
        StoredRecord::CallInquiry(call) => {
            assert_eq!(call.wins, 4);
            assert_eq!(call.total_calls, 8);
        }
        other => panic!("unexpected record: {:?}", other),
    }

    // unknown fields are rejected before anything is written
    let err = records
        .update(RecordKind::CallInquiry, &id, json!({ "win_count": 9 }))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Validation(_)));

    assert_eq!(
        dashboard
            .overview(DateRange::unbounded())
            .await
            .unwrap()
            .total_wins,
        4
    );

    records.soft_delete(RecordKind::CallInquiry, &id).await.unwrap();
    assert_eq!(
        dashboard
            .overview(DateRange::unbounded())
            .await
            .unwrap()
            .total_calls,
        0
    );
    assert!(
        records
            .get(RecordKind::CallInquiry, &id)
            .await
            .unwrap()
            .is_deleted()
    );

    records.restore(RecordKind::CallInquiry, &id).await.unwrap();
    assert_eq!(
        dashboard
            .overview(DateRange::unbounded())
            .await
            .unwrap()
            .total_calls,
        8
    );

    records.hard_delete(RecordKind::CallInquiry, &id).await.unwrap();
    assert!(matches!(
        records.get(RecordKind::CallInquiry, &id).await,
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        records.restore(RecordKind::CallInquiry, &id).await,
        Err(DashboardError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_ping() {
    let (storage, _dir) = create_temp_storage().await;
    assert!(storage.ping().await.is_ok());
    assert_eq!(storage.backend_name(), "sqlite");
}
