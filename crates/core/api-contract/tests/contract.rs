use api_contract::{CreateReadingRequest, DeviceDto, ScenarioRequest, SimulatorResultDto};
use serde_json::Value;

fn sample_device() -> DeviceDto {
    DeviceDto {
        id: "id-1".to_string(),
        device_id: "FRZ-001".to_string(),
        name: "Freezer 1".to_string(),
        location: "Warehouse A".to_string(),
        latitude: None,
        longitude: None,
        min_temp: Some(2.0),
        max_temp: Some(8.0),
        battery: 90,
        status: "online".to_string(),
        is_active: true,
        created_at_ms: 1_700_000_000_000,
        updated_at_ms: 1_700_000_000_000,
    }
}

#[test]
fn device_dto_is_camel_case() {
    let value = serde_json::to_value(sample_device()).expect("serialize");
    assert!(value.get("deviceId").is_some());
    assert!(value.get("minTemp").is_some());
    assert!(value.get("isActive").is_some());
    assert!(value.get("device_id").is_none());
    assert!(value.get("is_active").is_none());
}

#[test]
fn scenario_request_device_id_optional() {
    let req: ScenarioRequest = serde_json::from_str("{}").expect("parse");
    assert!(req.device_id.is_none());

    let req: ScenarioRequest =
        serde_json::from_str(r#"{"deviceId":"FRZ-001"}"#).expect("parse");
    assert_eq!(req.device_id.as_deref(), Some("FRZ-001"));
}

#[test]
fn create_reading_request_accepts_camel_case() {
    let payload = r#"{"deviceId":"FRZ-001","temperature":4.5,"battery":88}"#;
    let req: CreateReadingRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.device_id, "FRZ-001");
    assert_eq!(req.battery, Some(88));
    assert!(req.timestamp.is_none());
}

#[test]
fn simulator_result_shape() {
    let result = SimulatorResultDto {
        success: true,
        message: "ok".to_string(),
        affected_devices: vec![sample_device()],
    };
    let value = serde_json::to_value(result).expect("serialize");
    assert_eq!(value.get("success"), Some(&Value::Bool(true)));
    assert!(value.get("affectedDevices").is_some());
    assert!(value.get("affected_devices").is_none());
}
