use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::app::TestApp;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// 在随机端口上运行真实服务器，WebSocket 升级需要真实连接
pub struct LiveServer {
    pub addr: SocketAddr,
    pub app: TestApp,
}

impl LiveServer {
    pub async fn start(app: TestApp) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let router = app.app.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve test app");
        });
        Self { addr, app }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> WsClient {
        let (client, _) = tokio_tungstenite::connect_async(self.ws_url())
            .await
            .expect("websocket handshake");
        client
    }

    /// 等待服务端释放会话名额（连接任务在关闭后异步结束）
    pub async fn wait_for_active(&self, expected: usize) {
        for _ in 0..100 {
            if self.app.state.sessions().active() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "active sessions stuck at {}, expected {expected}",
            self.app.state.sessions().active()
        );
    }
}

pub async fn next_message(client: &mut WsClient) -> Message {
    tokio::time::timeout(RECV_TIMEOUT, client.next())
        .await
        .expect("server reply within timeout")
        .expect("stream still open")
        .expect("valid websocket message")
}

pub async fn next_json(client: &mut WsClient) -> Value {
    match next_message(client).await {
        Message::Text(text) => serde_json::from_str(&text).expect("json reply"),
        other => panic!("expected text reply, got {other:?}"),
    }
}

pub async fn send_frame(client: &mut WsClient, bytes: Vec<u8>) -> Value {
    client
        .send(Message::Binary(bytes))
        .await
        .expect("send binary frame");
    next_json(client).await
}

pub async fn send_text(client: &mut WsClient, text: &str) {
    client
        .send(Message::Text(text.to_string()))
        .await
        .expect("send text message");
}
