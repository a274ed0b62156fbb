use coldwatch_storage::{InMemoryReadingStore, ReadingFilter, ReadingRecord, ReadingStore};
use domain::ReadingStatus;

fn sample_reading(id: &str, device_id: &str, ts_ms: i64, status: ReadingStatus) -> ReadingRecord {
    ReadingRecord {
        id: id.to_string(),
        device_id: device_id.to_string(),
        temperature: 5.0,
        battery: Some(90),
        status,
        ts_ms,
    }
}

#[tokio::test]
async fn list_readings_orders_and_limits() {
    let store = InMemoryReadingStore::new();
    store
        .create_readings(&[
            sample_reading("r-1", "id-1", 1_000, ReadingStatus::Normal),
            sample_reading("r-2", "id-1", 3_000, ReadingStatus::Critical),
            sample_reading("r-3", "id-2", 2_000, ReadingStatus::Normal),
        ])
        .await
        .expect("write");

    let all = store
        .list_readings(&ReadingFilter::default())
        .await
        .expect("list");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, "r-2");

    let limited = store
        .list_readings(&ReadingFilter {
            limit: Some(1),
            ..ReadingFilter::default()
        })
        .await
        .expect("list");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, "r-2");

    let critical = store
        .list_readings(&ReadingFilter {
            status: Some(ReadingStatus::Critical),
            ..ReadingFilter::default()
        })
        .await
        .expect("list");
    assert_eq!(critical.len(), 1);

    let since = store
        .list_readings(&ReadingFilter {
            since_ms: Some(2_000),
            ..ReadingFilter::default()
        })
        .await
        .expect("list");
    assert_eq!(since.len(), 2);
}

#[tokio::test]
async fn latest_for_device_picks_newest() {
    let store = InMemoryReadingStore::new();
    store
        .create_reading(sample_reading("r-1", "id-1", 1_000, ReadingStatus::Normal))
        .await
        .expect("write");
    store
        .create_reading(sample_reading("r-2", "id-1", 5_000, ReadingStatus::Warning))
        .await
        .expect("write");

    let latest = store
        .latest_for_device("id-1")
        .await
        .expect("query")
        .expect("reading");
    assert_eq!(latest.id, "r-2");
    assert!(store.latest_for_device("id-9").await.expect("query").is_none());
}

#[tokio::test]
async fn latest_per_device_is_one_per_device() {
    let store = InMemoryReadingStore::new();
    store
        .create_readings(&[
            sample_reading("r-1", "id-1", 1_000, ReadingStatus::Normal),
            sample_reading("r-2", "id-1", 4_000, ReadingStatus::Normal),
            sample_reading("r-3", "id-2", 2_000, ReadingStatus::Normal),
        ])
        .await
        .expect("write");

    let mut latest = store.latest_per_device().await.expect("query");
    latest.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].id, "r-2");
    assert_eq!(latest[1].id, "r-3");
}

#[tokio::test]
async fn count_since_uses_inclusive_bound() {
    let store = InMemoryReadingStore::new();
    store
        .create_readings(&[
            sample_reading("r-1", "id-1", 1_000, ReadingStatus::Normal),
            sample_reading("r-2", "id-1", 2_000, ReadingStatus::Normal),
        ])
        .await
        .expect("write");
    assert_eq!(store.count_since(2_000).await.expect("count"), 1);
    assert_eq!(store.count_since(0).await.expect("count"), 2);
}
