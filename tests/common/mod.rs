//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use tokio::net::TcpListener;

use scytale_bridge::config::BridgeConfig;
use scytale_bridge::lifecycle::Shutdown;
use scytale_bridge::wrp::{self, Message, MessageType};
use scytale_bridge::HttpServer;

/// Path the mock backend serves WRP on.
pub const BACKEND_PATH: &str = "/api/v2/device";

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub message: Message,
}

type ReplyFn = dyn Fn(&Message) -> (StatusCode, Vec<u8>) + Send + Sync;

#[derive(Clone)]
struct BackendState {
    reply: Arc<ReplyFn>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A running mock WRP backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, BACKEND_PATH)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable mock backend speaking WRP over MessagePack.
///
/// Requests that fail to decode are answered with 400 and not recorded.
pub async fn start_wrp_backend<F>(reply: F) -> MockBackend
where
    F: Fn(&Message) -> (StatusCode, Vec<u8>) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = BackendState {
        reply: Arc::new(reply),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route(BACKEND_PATH, post(wrp_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, requests }
}

async fn wrp_handler(
    State(state): State<BackendState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Vec<u8>) {
    let Ok(message) = wrp::decode(&body) else {
        return (StatusCode::BAD_REQUEST, Vec::new());
    };
    let reply = (state.reply)(&message);
    state
        .requests
        .lock()
        .unwrap()
        .push(Recorded { headers, message });
    reply
}

/// Encode a reply to `request` carrying `payload`, as a device would.
pub fn reply_with(request: &Message, payload: Vec<u8>) -> Vec<u8> {
    let reply = Message {
        msg_type: MessageType::SimpleRequestResponse,
        source: request.destination.clone(),
        destination: request.source.clone(),
        transaction_uuid: request.transaction_uuid.clone(),
        content_type: "application/json".into(),
        status: Some(200),
        payload,
        ..Default::default()
    };
    wrp::encode(&reply).unwrap()
}

/// Device that echoes the request payload back.
pub fn echo(request: &Message) -> (StatusCode, Vec<u8>) {
    (StatusCode::OK, reply_with(request, request.payload.clone()))
}

/// A running gateway; dropping it shuts the server down.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn send_url(&self, device_id: &str, service: &str) -> String {
        self.url(&format!("/api/v1/{device_id}/send/{service}"))
    }

    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }
}

/// Gateway config pointing at `backend_url`, bound to an ephemeral port.
pub fn gateway_config(backend_url: &str) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backend.url = backend_url.into();
    config.backend.request_timeout_secs = 5;
    config.backend.connect_timeout_secs = 2;
    config
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: BridgeConfig) -> Gateway {
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    Gateway { addr, shutdown }
}

/// A local port with nothing listening on it.
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Client without pooling so each test request gets a fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
