use coldwatch_events::{EventBus, EventMessage, topics};
use coldwatch_simulator::{AlertGate, ScenarioEngine, SimulatorConfig};
use coldwatch_storage::{
    AlertFilter, AlertStore, DeviceRecord, DeviceStore, DeviceUpdate, InMemoryAlertStore,
    InMemoryDeviceStore, InMemoryReadingStore, ReadingFilter, ReadingStore,
};
use domain::{AlertType, DeviceStatus, ReadingStatus};
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    devices: Arc<InMemoryDeviceStore>,
    readings: Arc<InMemoryReadingStore>,
    alerts: Arc<InMemoryAlertStore>,
    bus: EventBus,
    engine: ScenarioEngine,
}

fn fixture() -> Fixture {
    fixture_with_recovery(Duration::from_millis(50))
}

fn fixture_with_recovery(recovery_delay: Duration) -> Fixture {
    let devices = Arc::new(InMemoryDeviceStore::new());
    let readings = Arc::new(InMemoryReadingStore::new());
    let alerts = Arc::new(InMemoryAlertStore::new());
    let bus = EventBus::new();
    let engine = ScenarioEngine::new(
        devices.clone(),
        readings.clone(),
        AlertGate::new(alerts.clone(), Duration::from_secs(300)),
        bus.clone(),
        SimulatorConfig { recovery_delay },
    );
    Fixture {
        devices,
        readings,
        alerts,
        bus,
        engine,
    }
}

fn device(id: &str, device_id: &str, status: DeviceStatus) -> DeviceRecord {
    DeviceRecord {
        id: id.to_string(),
        device_id: device_id.to_string(),
        name: format!("Freezer {device_id}"),
        location: "Warehouse A".to_string(),
        latitude: None,
        longitude: None,
        min_temp: Some(2.0),
        max_temp: Some(8.0),
        battery: 95,
        status,
        is_active: true,
        created_at_ms: 1_700_000_000_000,
        updated_at_ms: 1_700_000_000_000,
    }
}

async fn seed(fixture: &Fixture, records: Vec<DeviceRecord>) {
    for record in records {
        fixture.devices.create_device(record).await.expect("seed");
    }
}

#[tokio::test]
async fn unknown_explicit_device_always_fails() {
    let f = fixture();
    seed(&f, vec![device("id-1", "FRZ-001", DeviceStatus::Online)]).await;

    let excursion = f.engine.trigger_excursion(Some("FRZ-404")).await;
    assert!(!excursion.success);
    assert!(excursion.affected_devices.is_empty());

    let low_battery = f.engine.simulate_low_battery(Some("FRZ-404")).await;
    assert!(!low_battery.success);
    assert!(low_battery.affected_devices.is_empty());

    let offline = f.engine.take_device_offline(Some("FRZ-404")).await;
    assert!(!offline.success);
    assert!(offline.affected_devices.is_empty());
}

#[tokio::test]
async fn explicit_device_must_be_online() {
    let f = fixture();
    seed(&f, vec![device("id-1", "FRZ-001", DeviceStatus::Offline)]).await;

    let result = f.engine.trigger_excursion(Some("FRZ-001")).await;
    assert!(!result.success);
    assert!(result.message.contains("not online"));
}

#[tokio::test]
async fn random_target_requires_online_active_device() {
    let f = fixture();
    let mut inactive = device("id-1", "FRZ-001", DeviceStatus::Online);
    inactive.is_active = false;
    seed(&f, vec![inactive, device("id-2", "FRZ-002", DeviceStatus::Offline)]).await;

    let result = f.engine.trigger_excursion(None).await;
    assert!(!result.success);
    assert!(result.affected_devices.is_empty());
}

#[tokio::test]
async fn excursion_writes_critical_reading_and_dual_publishes() {
    let f = fixture();
    seed(
        &f,
        vec![
            device("id-1", "FRZ-001", DeviceStatus::Online),
            device("id-2", "FRZ-002", DeviceStatus::Online),
        ],
    )
    .await;
    let topic_1 = topics::temperature_topic_for("FRZ-001");
    let topic_2 = topics::temperature_topic_for("FRZ-002");
    let mut global = f.bus.subscribe(&[topics::TEMPERATURE_UPDATES]);
    let mut scoped = f.bus.subscribe(&[topic_1.as_str()]);
    let mut other = f.bus.subscribe(&[topic_2.as_str()]);

    let result = f.engine.trigger_excursion(Some("FRZ-001")).await;
    assert!(result.success, "{}", result.message);
    assert_eq!(result.affected_devices.len(), 1);

    // 12.0°C 距上界 8.0°C 有 4°C，超出 2°C 分界带，判 critical
    let readings = f
        .readings
        .list_readings(&ReadingFilter::default())
        .await
        .expect("list");
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].temperature, 12.0);
    assert_eq!(readings[0].status, ReadingStatus::Critical);
    assert_eq!(readings[0].battery, Some(95));

    // 全局主题和按设备主题各恰好一条；其他设备的主题不受影响
    assert!(matches!(
        global.try_recv().expect("global message"),
        EventMessage::TemperatureUpdate(_)
    ));
    assert!(global.try_recv().is_none());
    assert!(matches!(
        scoped.try_recv().expect("scoped message"),
        EventMessage::TemperatureUpdate(_)
    ));
    assert!(scoped.try_recv().is_none());
    assert!(other.try_recv().is_none());

    // 越界读数经告警门产出 critical 告警
    let alerts = f.alerts.list_alerts(&AlertFilter::default()).await.expect("list");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::TemperatureExcursion);
    assert_eq!(alerts[0].severity, domain::AlertSeverity::Critical);
}

#[tokio::test]
async fn low_battery_lands_in_expected_range() {
    let f = fixture();
    seed(&f, vec![device("id-1", "FRZ-001", DeviceStatus::Online)]).await;
    let mut status_sub = f.bus.subscribe(&[topics::DEVICE_STATUS_CHANGED]);

    // 区间是随机的，跑多轮确认始终落在 [5, 20) 内
    for _ in 0..10 {
        let result = f.engine.simulate_low_battery(Some("FRZ-001")).await;
        assert!(result.success, "{}", result.message);
        let battery = result.affected_devices[0].battery;
        assert!((5..20).contains(&battery), "battery {battery} out of range");
    }

    let stored = f
        .devices
        .find_device("id-1")
        .await
        .expect("query")
        .expect("device");
    assert!((5..20).contains(&stored.battery));
    assert!(status_sub.try_recv().is_some());

    let alerts = f.alerts.list_alerts(&AlertFilter::default()).await.expect("list");
    assert_eq!(alerts.len(), 1, "repeat triggers suppressed by dedup window");
    assert_eq!(alerts[0].alert_type, AlertType::LowBattery);
}

#[tokio::test]
async fn take_offline_transitions_and_alerts() {
    let f = fixture();
    seed(&f, vec![device("id-1", "FRZ-001", DeviceStatus::Online)]).await;
    let mut status_sub = f.bus.subscribe(&[topics::DEVICE_STATUS_CHANGED]);

    let result = f.engine.take_device_offline(Some("FRZ-001")).await;
    assert!(result.success, "{}", result.message);

    let stored = f
        .devices
        .find_device("id-1")
        .await
        .expect("query")
        .expect("device");
    assert_eq!(stored.status, DeviceStatus::Offline);

    match status_sub.try_recv().expect("status message") {
        EventMessage::DeviceStatusChanged(change) => {
            assert_eq!(change.device_id, "FRZ-001");
            assert_eq!(change.status, "offline");
        }
        other => panic!("unexpected message: {other:?}"),
    }

    let alerts = f.alerts.list_alerts(&AlertFilter::default()).await.expect("list");
    assert_eq!(alerts[0].alert_type, AlertType::DeviceOffline);
}

#[tokio::test]
async fn power_outage_downs_fleet_then_recovers() {
    let f = fixture_with_recovery(Duration::from_millis(50));
    let mut spare = device("id-3", "FRZ-003", DeviceStatus::Maintenance);
    spare.is_active = true;
    seed(
        &f,
        vec![
            device("id-1", "FRZ-001", DeviceStatus::Online),
            device("id-2", "FRZ-002", DeviceStatus::Online),
            spare,
        ],
    )
    .await;

    let result = f.engine.simulate_power_outage().await;
    assert!(result.success, "{}", result.message);
    assert_eq!(result.affected_devices.len(), 2);

    for id in ["id-1", "id-2"] {
        let stored = f.devices.find_device(id).await.expect("query").expect("device");
        assert_eq!(stored.status, DeviceStatus::Offline);
    }

    // 恢复延迟过后全部回到在线，维护中的设备不受影响
    tokio::time::sleep(Duration::from_millis(200)).await;
    for id in ["id-1", "id-2"] {
        let stored = f.devices.find_device(id).await.expect("query").expect("device");
        assert_eq!(stored.status, DeviceStatus::Online);
    }
    let spare = f.devices.find_device("id-3").await.expect("query").expect("device");
    assert_eq!(spare.status, DeviceStatus::Maintenance);
}

#[tokio::test]
async fn power_outage_recovery_respects_operator_changes() {
    let f = fixture_with_recovery(Duration::from_millis(80));
    seed(
        &f,
        vec![
            device("id-1", "FRZ-001", DeviceStatus::Online),
            device("id-2", "FRZ-002", DeviceStatus::Online),
        ],
    )
    .await;

    let result = f.engine.simulate_power_outage().await;
    assert!(result.success, "{}", result.message);

    // 延迟期间运维手动把一台设备转入维护，恢复必须跳过它
    f.devices
        .update_device(
            "id-1",
            DeviceUpdate {
                status: Some(DeviceStatus::Maintenance),
                ..DeviceUpdate::default()
            },
        )
        .await
        .expect("update");

    tokio::time::sleep(Duration::from_millis(250)).await;
    let manual = f.devices.find_device("id-1").await.expect("query").expect("device");
    assert_eq!(manual.status, DeviceStatus::Maintenance);
    let recovered = f.devices.find_device("id-2").await.expect("query").expect("device");
    assert_eq!(recovered.status, DeviceStatus::Online);
}

#[tokio::test]
async fn power_outage_without_online_devices_fails() {
    let f = fixture();
    seed(&f, vec![device("id-1", "FRZ-001", DeviceStatus::Offline)]).await;

    let result = f.engine.simulate_power_outage().await;
    assert!(!result.success);
    assert!(result.affected_devices.is_empty());
}

#[tokio::test]
async fn batch_arrival_caps_at_three_devices() {
    let f = fixture();
    seed(
        &f,
        vec![
            device("id-1", "FRZ-001", DeviceStatus::Offline),
            device("id-2", "FRZ-002", DeviceStatus::Offline),
            device("id-3", "FRZ-003", DeviceStatus::Offline),
            device("id-4", "FRZ-004", DeviceStatus::Offline),
        ],
    )
    .await;

    let result = f.engine.simulate_batch_arrival().await;
    assert!(result.success, "{}", result.message);
    assert_eq!(result.affected_devices.len(), 3);
    for device in &result.affected_devices {
        assert_eq!(device.status, DeviceStatus::Online);
        assert!((85..=100).contains(&device.battery));
    }

    // 每台上线设备各有一条正常读数
    assert_eq!(f.readings.len(), 3);

    let still_offline = f
        .devices
        .count_devices(&coldwatch_storage::DeviceFilter::offline_active())
        .await
        .expect("count");
    assert_eq!(still_offline, 1);
}

#[tokio::test]
async fn return_to_normal_is_idempotent_noop_when_nothing_eligible() {
    let f = fixture();
    seed(
        &f,
        vec![
            device("id-1", "FRZ-001", DeviceStatus::Offline),
            device("id-2", "FRZ-002", DeviceStatus::Maintenance),
        ],
    )
    .await;

    let first = f.engine.return_to_normal().await;
    assert!(first.success, "{}", first.message);
    assert_eq!(first.affected_devices.len(), 2);
    for id in ["id-1", "id-2"] {
        let stored = f.devices.find_device(id).await.expect("query").expect("device");
        assert_eq!(stored.status, DeviceStatus::Online);
        assert!((85..=100).contains(&stored.battery));
    }

    // 第二次没有可恢复设备：成功的空操作，不是失败
    let second = f.engine.return_to_normal().await;
    assert!(second.success, "{}", second.message);
    assert!(second.affected_devices.is_empty());
}
