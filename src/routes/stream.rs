use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;

use crate::response::AppError;
use crate::session::SessionHandler;
use crate::state::{AppState, SessionCounter, SessionSlot};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let max_sessions = state.config().limits.max_sessions;
    let Some(slot) = SessionCounter::try_acquire(state.sessions(), max_sessions) else {
        return Err(AppError::too_many_requests("Too many active sessions"));
    };

    // 帧大小由 decode_frame 校验并回复 FRAME_TOO_LARGE，传输层上限只拦截异常大的消息
    let limit = transport_limit(state.config().limits.max_frame_bytes);
    Ok(ws
        .max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| run_session(socket, state, slot)))
}

const MIN_TRANSPORT_LIMIT: usize = 16 * 1024 * 1024;

fn transport_limit(max_frame_bytes: usize) -> usize {
    max_frame_bytes.saturating_mul(4).max(MIN_TRANSPORT_LIMIT)
}

async fn run_session(mut socket: WebSocket, state: AppState, _slot: SessionSlot) {
    let mut handler = SessionHandler::new(
        state.pipeline().clone(),
        state.perception().clone(),
        state.config().limits.max_frame_bytes,
    );
    let mut shutdown_rx = state.shutdown_rx();
    let session_id = handler.id();

    tracing::info!(%session_id, active = state.sessions().active(), "WebSocket session opened");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Binary(bytes))) => {
                        let reply = handler.handle_frame(bytes).await;
                        let json = match serde_json::to_string(&reply) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!(%session_id, error = %e, "Failed to encode frame reply");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        if is_ping(&text) {
                            let pong = serde_json::json!({ "type": "pong" });
                            if socket.send(Message::Text(pong.to_string())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(%session_id, error = %e, "WebSocket receive failed");
                        break;
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }

    tracing::info!(
        %session_id,
        frames = handler.frames(),
        skipped = handler.skipped(),
        sleeping = handler.state().sleeping,
        "WebSocket session closed"
    );
}

fn is_ping(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(|t| t == "ping"))
        .unwrap_or(false)
}
