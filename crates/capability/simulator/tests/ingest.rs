use coldwatch_events::{EventBus, topics};
use coldwatch_simulator::{AlertGate, IngestError, ReadingIngest};
use coldwatch_storage::{
    AlertFilter, AlertStore, DeviceRecord, DeviceStore, InMemoryAlertStore, InMemoryDeviceStore,
    InMemoryReadingStore,
};
use domain::{AlertSeverity, AlertType, DeviceStatus, ReadingStatus};
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    devices: Arc<InMemoryDeviceStore>,
    readings: Arc<InMemoryReadingStore>,
    alerts: Arc<InMemoryAlertStore>,
    bus: EventBus,
    ingest: ReadingIngest,
}

fn fixture() -> Fixture {
    let devices = Arc::new(InMemoryDeviceStore::new());
    let readings = Arc::new(InMemoryReadingStore::new());
    let alerts = Arc::new(InMemoryAlertStore::new());
    let bus = EventBus::new();
    let ingest = ReadingIngest::new(
        devices.clone(),
        readings.clone(),
        AlertGate::new(alerts.clone(), Duration::from_secs(300)),
        bus.clone(),
    );
    Fixture {
        devices,
        readings,
        alerts,
        bus,
        ingest,
    }
}

async fn seed_device(fixture: &Fixture) {
    fixture
        .devices
        .create_device(DeviceRecord {
            id: "id-1".to_string(),
            device_id: "FRZ-001".to_string(),
            name: "Freezer FRZ-001".to_string(),
            location: "Warehouse A".to_string(),
            latitude: None,
            longitude: None,
            min_temp: Some(2.0),
            max_temp: Some(8.0),
            battery: 95,
            status: DeviceStatus::Online,
            is_active: true,
            created_at_ms: 1_700_000_000_000,
            updated_at_ms: 1_700_000_000_000,
        })
        .await
        .expect("seed");
}

#[tokio::test]
async fn unknown_device_is_rejected() {
    let f = fixture();
    let err = f
        .ingest
        .ingest("FRZ-404", 4.5, None, None)
        .await
        .expect_err("unknown device");
    assert!(matches!(err, IngestError::DeviceNotFound(_)));
    assert_eq!(f.readings.len(), 0);
}

#[tokio::test]
async fn normal_reading_creates_no_alert() {
    let f = fixture();
    seed_device(&f).await;

    let reading = f.ingest.ingest("FRZ-001", 4.5, None, None).await.expect("ingest");
    assert_eq!(reading.status, ReadingStatus::Normal);
    assert_eq!(f.alerts.len(), 0);
}

#[tokio::test]
async fn out_of_band_reading_classifies_fresh_and_alerts_once() {
    let f = fixture();
    seed_device(&f).await;

    let warning = f.ingest.ingest("FRZ-001", 9.5, None, None).await.expect("ingest");
    assert_eq!(warning.status, ReadingStatus::Warning);

    let alerts = f.alerts.list_alerts(&AlertFilter::default()).await.expect("list");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::TemperatureExcursion);
    assert_eq!(alerts[0].severity, AlertSeverity::Warning);

    // 去重窗口内的第二条越界读数：照常入库，但不再产出告警
    let critical = f.ingest.ingest("FRZ-001", 12.0, None, None).await.expect("ingest");
    assert_eq!(critical.status, ReadingStatus::Critical);
    assert_eq!(f.readings.len(), 2);
    assert_eq!(f.alerts.len(), 1);
}

#[tokio::test]
async fn battery_report_updates_device() {
    let f = fixture();
    seed_device(&f).await;

    f.ingest
        .ingest("FRZ-001", 4.5, Some(42), None)
        .await
        .expect("ingest");
    let device = f
        .devices
        .find_device("id-1")
        .await
        .expect("query")
        .expect("device");
    assert_eq!(device.battery, 42);
}

#[tokio::test]
async fn ingest_dual_publishes_temperature() {
    let f = fixture();
    seed_device(&f).await;
    let scoped_topic = topics::temperature_topic_for("FRZ-001");
    let mut global = f.bus.subscribe(&[topics::TEMPERATURE_UPDATES]);
    let mut scoped = f.bus.subscribe(&[scoped_topic.as_str()]);

    f.ingest.ingest("FRZ-001", 4.5, None, None).await.expect("ingest");

    assert!(global.try_recv().is_some());
    assert!(global.try_recv().is_none());
    assert!(scoped.try_recv().is_some());
    assert!(scoped.try_recv().is_none());
}

#[tokio::test]
async fn explicit_timestamp_is_preserved() {
    let f = fixture();
    seed_device(&f).await;

    let reading = f
        .ingest
        .ingest("FRZ-001", 4.5, None, Some(1_700_000_123_456))
        .await
        .expect("ingest");
    assert_eq!(reading.ts_ms, 1_700_000_123_456);
}
