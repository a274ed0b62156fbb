use coldwatch_storage::{DeviceFilter, DeviceRecord, DeviceStore, DeviceUpdate, InMemoryDeviceStore};
use domain::DeviceStatus;

fn sample_device(id: &str, device_id: &str, status: DeviceStatus) -> DeviceRecord {
    DeviceRecord {
        id: id.to_string(),
        device_id: device_id.to_string(),
        name: format!("Freezer {device_id}"),
        location: "Warehouse A".to_string(),
        latitude: None,
        longitude: None,
        min_temp: Some(2.0),
        max_temp: Some(8.0),
        battery: 100,
        status,
        is_active: true,
        created_at_ms: 1_700_000_000_000,
        updated_at_ms: 1_700_000_000_000,
    }
}

#[tokio::test]
async fn create_and_find_device() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(sample_device("id-1", "FRZ-001", DeviceStatus::Online))
        .await
        .expect("create");

    let by_id = store.find_device("id-1").await.expect("query").expect("device");
    assert_eq!(by_id.device_id, "FRZ-001");

    let by_device_id = store
        .find_by_device_id("FRZ-001")
        .await
        .expect("query")
        .expect("device");
    assert_eq!(by_device_id.id, "id-1");

    assert!(store.find_device("missing").await.expect("query").is_none());
}

#[tokio::test]
async fn create_rejects_duplicate_device_id() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(sample_device("id-1", "FRZ-001", DeviceStatus::Online))
        .await
        .expect("create");
    let err = store
        .create_device(sample_device("id-2", "FRZ-001", DeviceStatus::Online))
        .await
        .expect_err("duplicate");
    assert_eq!(err.to_string(), "device_id exists");
}

#[tokio::test]
async fn list_devices_filters_status_and_active() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(sample_device("id-1", "FRZ-001", DeviceStatus::Online))
        .await
        .expect("create");
    store
        .create_device(sample_device("id-2", "FRZ-002", DeviceStatus::Offline))
        .await
        .expect("create");
    let mut inactive = sample_device("id-3", "FRZ-003", DeviceStatus::Online);
    inactive.is_active = false;
    store.create_device(inactive).await.expect("create");

    let online = store
        .list_devices(&DeviceFilter::online_active())
        .await
        .expect("list");
    assert_eq!(online.len(), 1);
    assert_eq!(online[0].device_id, "FRZ-001");

    let all = store.list_devices(&DeviceFilter::default()).await.expect("list");
    assert_eq!(all.len(), 3);
    assert_eq!(
        store
            .count_devices(&DeviceFilter::offline_active())
            .await
            .expect("count"),
        1
    );
}

#[tokio::test]
async fn update_device_is_partial() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(sample_device("id-1", "FRZ-001", DeviceStatus::Online))
        .await
        .expect("create");

    let updated = store
        .update_device(
            "id-1",
            DeviceUpdate {
                battery: Some(15),
                status: Some(DeviceStatus::Maintenance),
                ..DeviceUpdate::default()
            },
        )
        .await
        .expect("update")
        .expect("device");
    assert_eq!(updated.battery, 15);
    assert_eq!(updated.status, DeviceStatus::Maintenance);
    // 未指定的字段保持原值
    assert_eq!(updated.name, "Freezer FRZ-001");
    assert_eq!(updated.min_temp, Some(2.0));

    assert!(
        store
            .update_device("missing", DeviceUpdate::default())
            .await
            .expect("update")
            .is_none()
    );
}

#[tokio::test]
async fn update_status_many_skips_missing_ids() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(sample_device("id-1", "FRZ-001", DeviceStatus::Online))
        .await
        .expect("create");
    store
        .create_device(sample_device("id-2", "FRZ-002", DeviceStatus::Online))
        .await
        .expect("create");

    let updated = store
        .update_status_many(
            &[
                "id-1".to_string(),
                "id-2".to_string(),
                "missing".to_string(),
            ],
            DeviceStatus::Offline,
        )
        .await
        .expect("update");
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|d| d.status == DeviceStatus::Offline));
}
