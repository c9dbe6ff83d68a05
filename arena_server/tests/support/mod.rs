// One-time arena server bootstrap plus WebSocket helpers shared by integration tests.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

// WebSocket endpoint published once the server thread has bound its port.
static SERVER_WS_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts the shared server on first use and returns its `/ws` URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_addr = Arc::new(OnceLock::<String>::new());
        let published_addr_thread = Arc::clone(&published_addr);
        // The server gets its own OS thread and runtime so it outlives each
        // `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_addr_thread.set(addr.to_string());
                arena_server::run(listener).await.expect("server failed");
            });
        });
        wait_until_accepting(published_addr);
    });

    SERVER_WS_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn wait_until_accepting(published_addr: Arc<OnceLock<String>>) {
    let addr = loop {
        if let Some(addr) = published_addr.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_WS_URL.set(format!("ws://{addr}/ws"));

    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("server did not become ready in time");
}

/// Opens a connection and consumes the Identity message, returning the assigned id.
pub async fn connect() -> (Client, String) {
    let (mut client, _) = connect_async(ensure_server())
        .await
        .expect("websocket handshake");
    let identity = recv_type(&mut client, "Identity").await;
    let player_id = identity["data"]["player_id"]
        .as_str()
        .expect("player id string")
        .to_string();
    (client, player_id)
}

pub async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("send message");
}

pub async fn send_text(client: &mut Client, text: &str) {
    client
        .send(Message::Text(text.to_string().into()))
        .await
        .expect("send message");
}

pub async fn join(client: &mut Client, display_name: &str) {
    send_json(
        client,
        serde_json::json!({"type": "Join", "data": {"display_name": display_name}}),
    )
    .await;
}

/// Reads text messages until one of type `kind` arrives.
pub async fn recv_type(client: &mut Client, kind: &str) -> Value {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            let msg = client
                .next()
                .await
                .expect("connection open")
                .expect("valid frame");
            let Message::Text(text) = msg else {
                continue;
            };
            let value: Value = serde_json::from_str(text.as_str()).expect("server sends json");
            if value["type"] == kind {
                return value;
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no {kind} message in time"))
}

/// Reads until the server's close frame and returns its code.
pub async fn recv_close_code(client: &mut Client) -> Option<u16> {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(frame))) => return frame.map(|f| u16::from(f.code)),
                Some(Ok(_)) => continue,
                other => panic!("connection ended without a close frame: {other:?}"),
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no close frame in time"))
}
