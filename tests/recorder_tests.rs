//! Recorder tests
//!
//! SeaOrmRecorder against temporary SQLite databases.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use geolookup::cache::MemoryLookupCache;
use geolookup::config::DatabaseConfig;
use geolookup::errors::GeoLookupError;
use geolookup::services::LookupService;
use geolookup::services::geoip::{
    Fetcher, GeoTransport, LookupKey, RetryPolicy, TransportError, TransportResponse,
};
use geolookup::storage::{LookupRecord, Recorder, SeaOrmRecorder, create_recorder};
use tempfile::TempDir;

fn sqlite_config(dir: &TempDir) -> DatabaseConfig {
    let db_path = dir.path().join("lookups.db");
    DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        pool_size: 2,
        timeout: 5,
    }
}

async fn create_temp_recorder() -> (SeaOrmRecorder, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let recorder = SeaOrmRecorder::new(&sqlite_config(&temp_dir))
        .await
        .expect("Failed to create recorder");
    (recorder, temp_dir)
}

#[tokio::test]
async fn test_record_and_count() {
    let (recorder, _dir) = create_temp_recorder().await;
    assert_eq!(recorder.count().await.unwrap(), 0);
    assert_eq!(recorder.stored_count().await.unwrap(), Some(0));

    let ok = LookupKey::parse("8.8.8.8").unwrap();
    let bad = LookupKey::parse("2001:db8::1").unwrap();
    recorder.record(LookupRecord::succeeded(&ok)).await.unwrap();
    recorder.record(LookupRecord::failed(&bad)).await.unwrap();

    assert_eq!(recorder.count().await.unwrap(), 2);
    assert_eq!(recorder.stored_count().await.unwrap(), Some(2));

    let recent = recorder.recent(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].ip_address, "2001:db8::1");
    assert!(!recent[0].success);
    assert_eq!(recent[1].ip_address, "8.8.8.8");
    assert!(recent[1].success);
}

#[tokio::test]
async fn test_lookup_time_round_trips() {
    let (recorder, _dir) = create_temp_recorder().await;
    let record = LookupRecord::succeeded(&LookupKey::parse("1.1.1.1").unwrap());

    recorder.record(record.clone()).await.unwrap();

    let stored = recorder.recent(1).await.unwrap().remove(0);
    assert_eq!(stored.ip_address, record.ip_address);
    let drift = (stored.lookup_time - record.lookup_time).num_milliseconds().abs();
    assert!(drift < 1000, "lookup_time drifted by {}ms", drift);
}

#[tokio::test]
async fn test_reopen_keeps_rows() {
    let temp_dir = TempDir::new().unwrap();
    let config = sqlite_config(&temp_dir);

    let recorder = SeaOrmRecorder::new(&config).await.unwrap();
    recorder
        .record(LookupRecord::succeeded(&LookupKey::parse("9.9.9.9").unwrap()))
        .await
        .unwrap();
    recorder.close().await.unwrap();

    // 迁移可重复执行
    let reopened = SeaOrmRecorder::new(&config).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_recorder_empty_url_is_noop() {
    let config = DatabaseConfig {
        database_url: String::new(),
        ..Default::default()
    };
    let handle = create_recorder(&config).await.unwrap();
    assert_eq!(handle.recorder.name(), "noop");
    assert_eq!(handle.recorder.stored_count().await.unwrap(), None);
    assert!(handle.database.is_none());

    handle
        .recorder
        .record(LookupRecord::succeeded(&LookupKey::parse("8.8.8.8").unwrap()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_recorder_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let handle = create_recorder(&sqlite_config(&temp_dir)).await.unwrap();
    assert_eq!(handle.recorder.name(), "sea-orm");
    assert!(handle.database.is_some());
}

#[tokio::test]
async fn test_unknown_database_url_rejected() {
    let config = DatabaseConfig {
        database_url: "redis://localhost:6379".to_string(),
        ..Default::default()
    };
    let err = create_recorder(&config).await.err().unwrap();
    assert!(matches!(err, GeoLookupError::DatabaseConfig(_)));
}

struct FlakyTransport;

#[async_trait]
impl GeoTransport for FlakyTransport {
    async fn send(
        &self,
        key: &LookupKey,
    ) -> std::result::Result<TransportResponse, TransportError> {
        if key.as_str() == "8.8.8.8" {
            Ok(TransportResponse::new(
                200,
                r#"{"status":"success","description":"ok","data":{"geo":{"city":"Mountain View"}}}"#,
            ))
        } else {
            Ok(TransportResponse::new(500, "internal error"))
        }
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::test]
async fn test_lookup_service_writes_audit_rows() {
    let (recorder, _dir) = create_temp_recorder().await;
    let recorder = Arc::new(recorder);

    let fetcher = Fetcher::new(
        Arc::new(FlakyTransport),
        RetryPolicy::new(3, Duration::from_millis(1), 2.0),
        Duration::from_secs(1),
    );
    let service = LookupService::new(
        Arc::new(MemoryLookupCache::new(Duration::from_secs(60))),
        Arc::new(fetcher),
        recorder.clone(),
    );

    service.lookup("8.8.8.8").await.unwrap();
    // 命中缓存不写记录
    service.lookup("8.8.8.8").await.unwrap();
    service.lookup("8.8.4.4").await.unwrap_err();

    assert_eq!(recorder.count().await.unwrap(), 2);
    let recent = recorder.recent(10).await.unwrap();
    assert_eq!(recent[0].ip_address, "8.8.4.4");
    assert!(!recent[0].success);
    assert_eq!(recent[1].ip_address, "8.8.8.8");
    assert!(recent[1].success);
}
