//! coldwatch HTTP API 服务器（唯一运行时二进制）。
//!
//! 装配顺序：.env -> 配置 -> 日志 -> 存储后端 -> 事件总线 ->
//! 模拟引擎/上报管线/统计门面 -> 心跳任务 -> 路由 -> 监听。
//!
//! 存储后端由 COLDWATCH_STORE 选择：memory（演示/测试）或
//! postgres（生产，需先执行 migrations/）。

mod handlers;
mod middleware;
mod routes;
mod utils;

use coldwatch_config::{AppConfig, StoreBackend};
use coldwatch_events::{EventBus, spawn_heartbeat};
use coldwatch_simulator::{
    AlertGate, FleetStats, ReadingIngest, ScenarioEngine, SimulatorConfig,
};
use coldwatch_storage::{
    AlertStore, DeviceStore, InMemoryAlertStore, InMemoryDeviceStore, InMemoryReadingStore,
    PgAlertStore, PgDeviceStore, PgReadingStore, ReadingStore, connect_pool,
};
use coldwatch_telemetry::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 应用状态，所有 handler 共享。
///
/// 存储走 Arc<dyn Trait>；引擎/管线/门面各自持有所需依赖的克隆，
/// 没有进程级单例。
#[derive(Clone)]
pub struct AppState {
    pub device_store: Arc<dyn DeviceStore>,
    pub reading_store: Arc<dyn ReadingStore>,
    pub alert_store: Arc<dyn AlertStore>,
    pub engine: Arc<ScenarioEngine>,
    pub ingest: Arc<ReadingIngest>,
    pub stats: Arc<FleetStats>,
    pub bus: EventBus,
}

impl AppState {
    /// 从三个存储实现装配完整状态。
    pub fn assemble(
        device_store: Arc<dyn DeviceStore>,
        reading_store: Arc<dyn ReadingStore>,
        alert_store: Arc<dyn AlertStore>,
        dedup_window: Duration,
        recovery_delay: Duration,
    ) -> Self {
        let bus = EventBus::new();
        let engine = Arc::new(ScenarioEngine::new(
            Arc::clone(&device_store),
            Arc::clone(&reading_store),
            AlertGate::new(Arc::clone(&alert_store), dedup_window),
            bus.clone(),
            SimulatorConfig { recovery_delay },
        ));
        let ingest = Arc::new(ReadingIngest::new(
            Arc::clone(&device_store),
            Arc::clone(&reading_store),
            AlertGate::new(Arc::clone(&alert_store), dedup_window),
            bus.clone(),
        ));
        let stats = Arc::new(FleetStats::new(
            Arc::clone(&device_store),
            Arc::clone(&reading_store),
            Arc::clone(&alert_store),
        ));
        Self {
            device_store,
            reading_store,
            alert_store,
            engine,
            ingest,
            stats,
            bus,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let (device_store, reading_store, alert_store): (
        Arc<dyn DeviceStore>,
        Arc<dyn ReadingStore>,
        Arc<dyn AlertStore>,
    ) = match config.store_backend {
        StoreBackend::Memory => {
            info!(target: "coldwatch.api", "using in-memory store backend");
            (
                Arc::new(InMemoryDeviceStore::new()),
                Arc::new(InMemoryReadingStore::new()),
                Arc::new(InMemoryAlertStore::new()),
            )
        }
        StoreBackend::Postgres => {
            // 配置层已保证 postgres 后端必有数据库地址
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("COLDWATCH_DATABASE_URL is required for the postgres backend")?;
            let pool = connect_pool(database_url).await?;
            info!(target: "coldwatch.api", "using postgres store backend");
            (
                Arc::new(PgDeviceStore::new(pool.clone())),
                Arc::new(PgReadingStore::new(pool.clone())),
                Arc::new(PgAlertStore::new(pool)),
            )
        }
    };

    let state = AppState::assemble(
        device_store,
        reading_store,
        alert_store,
        Duration::from_secs(config.alert_dedup_window_minutes * 60),
        Duration::from_secs(config.recovery_delay_seconds),
    );

    // PING 心跳独立于任何场景，随进程退出而结束
    spawn_heartbeat(
        state.bus.clone(),
        Duration::from_secs(config.ping_interval_seconds),
    );

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(tower_http::trace::TraceLayer::new_for_http());

    info!(target: "coldwatch.api", addr = %config.http_addr, "listening");
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
