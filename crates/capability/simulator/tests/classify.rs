use coldwatch_simulator::classify;
use domain::ReadingStatus;

#[test]
fn missing_threshold_is_always_normal() {
    assert_eq!(classify(50.0, None, Some(8.0)), ReadingStatus::Normal);
    assert_eq!(classify(-30.0, Some(2.0), None), ReadingStatus::Normal);
    assert_eq!(classify(100.0, None, None), ReadingStatus::Normal);
}

#[test]
fn in_band_is_normal_inclusive() {
    assert_eq!(classify(5.0, Some(2.0), Some(8.0)), ReadingStatus::Normal);
    assert_eq!(classify(2.0, Some(2.0), Some(8.0)), ReadingStatus::Normal);
    assert_eq!(classify(8.0, Some(2.0), Some(8.0)), ReadingStatus::Normal);
}

#[test]
fn out_of_band_within_two_degrees_is_warning() {
    assert_eq!(classify(9.5, Some(2.0), Some(8.0)), ReadingStatus::Warning);
    assert_eq!(classify(10.0, Some(2.0), Some(8.0)), ReadingStatus::Warning);
    assert_eq!(classify(0.5, Some(2.0), Some(8.0)), ReadingStatus::Warning);
    assert_eq!(classify(0.0, Some(2.0), Some(8.0)), ReadingStatus::Warning);
}

#[test]
fn out_of_band_beyond_two_degrees_is_critical() {
    assert_eq!(classify(10.1, Some(2.0), Some(8.0)), ReadingStatus::Critical);
    assert_eq!(classify(-0.1, Some(2.0), Some(8.0)), ReadingStatus::Critical);
    // 哨兵温度 12.0 距上界 4°C，判 critical
    assert_eq!(classify(12.0, Some(2.0), Some(8.0)), ReadingStatus::Critical);
}

#[test]
fn classification_is_deterministic() {
    for _ in 0..10 {
        assert_eq!(classify(9.0, Some(2.0), Some(8.0)), ReadingStatus::Warning);
    }
}
