pub mod health;
pub mod stream;

use axum::routing::get;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();
    let index = format!("{static_dir}/index.html");
    let spa_fallback = ServeDir::new(&static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/ws", get(stream::ws_handler))
        .nest("/health", health::router())
        .fallback_service(spa_fallback)
        .with_state(state)
}
