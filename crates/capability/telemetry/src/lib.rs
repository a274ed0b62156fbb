//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub readings_created: u64,
    pub alerts_created: u64,
    pub alerts_suppressed: u64,
    pub scenarios_triggered: u64,
    pub scenario_failures: u64,
    pub events_published: u64,
    pub recoveries_run: u64,
    pub heartbeats_sent: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    readings_created: AtomicU64,
    alerts_created: AtomicU64,
    alerts_suppressed: AtomicU64,
    scenarios_triggered: AtomicU64,
    scenario_failures: AtomicU64,
    events_published: AtomicU64,
    recoveries_run: AtomicU64,
    heartbeats_sent: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            readings_created: AtomicU64::new(0),
            alerts_created: AtomicU64::new(0),
            alerts_suppressed: AtomicU64::new(0),
            scenarios_triggered: AtomicU64::new(0),
            scenario_failures: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            recoveries_run: AtomicU64::new(0),
            heartbeats_sent: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            readings_created: self.readings_created.load(Ordering::Relaxed),
            alerts_created: self.alerts_created.load(Ordering::Relaxed),
            alerts_suppressed: self.alerts_suppressed.load(Ordering::Relaxed),
            scenarios_triggered: self.scenarios_triggered.load(Ordering::Relaxed),
            scenario_failures: self.scenario_failures.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            recoveries_run: self.recoveries_run.load(Ordering::Relaxed),
            heartbeats_sent: self.heartbeats_sent.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录读数创建次数。
pub fn record_reading_created() {
    metrics().readings_created.fetch_add(1, Ordering::Relaxed);
}

/// 记录告警创建次数。
pub fn record_alert_created() {
    metrics().alerts_created.fetch_add(1, Ordering::Relaxed);
}

/// 记录告警被去重抑制的次数。
pub fn record_alert_suppressed() {
    metrics().alerts_suppressed.fetch_add(1, Ordering::Relaxed);
}

/// 记录场景触发次数。
pub fn record_scenario_triggered() {
    metrics().scenarios_triggered.fetch_add(1, Ordering::Relaxed);
}

/// 记录场景失败次数。
pub fn record_scenario_failure() {
    metrics().scenario_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录事件发布次数（按主题计）。
pub fn record_event_published() {
    metrics().events_published.fetch_add(1, Ordering::Relaxed);
}

/// 记录定时恢复执行次数。
pub fn record_recovery_run() {
    metrics().recoveries_run.fetch_add(1, Ordering::Relaxed);
}

/// 记录心跳发布次数。
pub fn record_heartbeat_sent() {
    metrics().heartbeats_sent.fetch_add(1, Ordering::Relaxed);
}
