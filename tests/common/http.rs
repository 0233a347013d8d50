use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

pub async fn request(app: &Router, method: Method, path: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("empty body");

    app.clone().oneshot(req).await.expect("oneshot response")
}

pub async fn response_text(resp: Response) -> (StatusCode, String) {
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body bytes");
    (status, String::from_utf8_lossy(&bytes).to_string())
}

pub async fn response_json(resp: Response) -> (StatusCode, Value) {
    let (status, text) = response_text(resp).await;
    let json = if text.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str::<Value>(&text).expect("parse json body")
    };
    (status, json)
}
