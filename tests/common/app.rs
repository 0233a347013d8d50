use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;

use behavior_backend::analysis::AnalysisConfig;
use behavior_backend::config::{Config, PerceptionConfig, SessionLimits};
use behavior_backend::routes::build_router;
use behavior_backend::services::perception::{DisabledPerception, PerceptionEngine};
use behavior_backend::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    pub shutdown_tx: broadcast::Sender<()>,
    pub static_dir: TempDir,
}

pub fn test_config(static_dir: &TempDir) -> Config {
    // 直接构造 Config，避免 set_var 造成多线程测试环境变量竞态
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 8000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        static_dir: static_dir.path().to_string_lossy().to_string(),
        limits: SessionLimits::default(),
        perception: PerceptionConfig::default(),
        analysis: AnalysisConfig::default(),
    }
}

pub fn spawn_with_engine(perception: Arc<dyn PerceptionEngine>) -> TestApp {
    spawn_with(perception, |_| {})
}

pub fn spawn_with(
    perception: Arc<dyn PerceptionEngine>,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let static_dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        static_dir.path().join("index.html"),
        "<!doctype html><title>monitor</title>",
    )
    .expect("write index.html");

    let mut config = test_config(&static_dir);
    configure(&mut config);
    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(&config, perception, shutdown_tx.clone());
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        shutdown_tx,
        static_dir,
    }
}

pub fn spawn_test_app() -> TestApp {
    spawn_with_engine(Arc::new(DisabledPerception))
}
