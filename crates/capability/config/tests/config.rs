use coldwatch_config::{AppConfig, StoreBackend};

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("COLDWATCH_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("COLDWATCH_PING_INTERVAL_SECONDS", "10");
        std::env::set_var("COLDWATCH_RECOVERY_DELAY_SECONDS", "45");
        std::env::remove_var("COLDWATCH_STORE");
        std::env::remove_var("COLDWATCH_DATABASE_URL");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.store_backend, StoreBackend::Memory);
    assert_eq!(config.ping_interval_seconds, 10);
    assert_eq!(config.recovery_delay_seconds, 45);
    assert_eq!(config.alert_dedup_window_minutes, 5);
}
