use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "sessions": {
            "active": state.sessions().active(),
            "total": state.sessions().total(),
            "max": state.config().limits.max_sessions,
        },
        "perception": state.perception().mode(),
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// 检测服务未配置时仍可接受连接，但只会返回部分结果
pub async fn readiness(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let mode = state.perception().mode();
    Json(serde_json::json!({
        "ready": true,
        "perception": mode,
        "degraded": mode == "disabled",
    }))
}
