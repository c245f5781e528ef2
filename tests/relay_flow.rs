//! End-to-end tests driving a relay bound to a local port over real HTTP
//! and WebSocket connections.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use checkout_relay::app_state::AppState;
use checkout_relay::domain::{PublicEndpoint, TransactionRegistry};
use checkout_relay::server::build_app;
use checkout_relay::service::RelayService;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const INDEX_HTML: &str = "<!doctype html><title>checkout</title>";

struct Relay {
    addr: SocketAddr,
    service: Arc<RelayService>,
    http: reqwest::Client,
}

impl Relay {
    async fn start() -> Self {
        let service = Arc::new(RelayService::new(
            Arc::new(TransactionRegistry::new()),
            PublicEndpoint::new(),
        ));
        let state = AppState::new(Arc::clone(&service), static_dir());
        let app = build_app(state, Duration::from_secs(5));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            service,
            http: reqwest::Client::new(),
        }
    }

    async fn connect(&self, path: &str) -> Client {
        let url = format!("ws://{}{path}", self.addr);
        let Ok((socket, _)) = tokio_tungstenite::connect_async(url).await else {
            panic!("ws connect failed");
        };
        socket
    }

    async fn register(&self, client: &mut Client, transaction_id: &str, expected_active: usize) {
        let frame = json!({"type": "register", "transactionId": transaction_id}).to_string();
        if client.send(Message::text(frame)).await.is_err() {
            panic!("ws send failed");
        }
        self.wait_for_active(expected_active).await;
    }

    async fn wait_for_active(&self, expected: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(5), async {
            while self.service.active_transactions().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        if waited.is_err() {
            panic!("registry never reached {expected} active transactions");
        }
    }

    async fn confirm(&self, body: Value) -> (u16, Value) {
        let url = format!("http://{}/api/confirm-payment", self.addr);
        let Ok(resp) = self.http.post(url).json(&body).send().await else {
            panic!("confirm request failed");
        };
        let status = resp.status().as_u16();
        let Ok(body) = resp.json::<Value>().await else {
            panic!("confirm response was not JSON");
        };
        (status, body)
    }

    async fn get(&self, path: &str) -> (u16, String) {
        let url = format!("http://{}{path}", self.addr);
        let Ok(resp) = self.http.get(url).send().await else {
            panic!("GET {path} failed");
        };
        let status = resp.status().as_u16();
        let Ok(text) = resp.text().await else {
            panic!("GET {path} body unreadable");
        };
        (status, text)
    }
}

fn static_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("checkout-relay-{}", uuid::Uuid::new_v4()));
    if std::fs::create_dir_all(&dir).is_err()
        || std::fs::write(dir.join("index.html"), INDEX_HTML).is_err()
    {
        panic!("could not prepare static dir");
    }
    dir
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let Ok(frame) = tokio::time::timeout(Duration::from_secs(5), client.next()).await else {
            panic!("timed out waiting for a result message");
        };
        match frame {
            Some(Ok(Message::Text(text))) => {
                let Ok(value) = serde_json::from_str(text.as_str()) else {
                    panic!("result message is not JSON: {text}");
                };
                return value;
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

async fn expect_silence(client: &mut Client) {
    if let Ok(frame) = tokio::time::timeout(Duration::from_millis(200), client.next()).await {
        panic!("expected no message, got {frame:?}");
    }
}

#[tokio::test]
async fn registered_client_receives_payment_success() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/").await;
    relay.register(&mut client, "tx-1", 1).await;

    let (status, body) = relay
        .confirm(json!({"transactionId": "tx-1", "status": "success"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Confirmation received"}));

    assert_eq!(
        next_json(&mut client).await,
        json!({"type": "payment_success", "transactionId": "tx-1"})
    );
    relay.wait_for_active(0).await;
}

#[tokio::test]
async fn non_success_status_pushes_payment_cancelled() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/ws").await;
    relay.register(&mut client, "tx-2", 1).await;

    let (status, _) = relay
        .confirm(json!({"transactionId": "tx-2", "status": "cancelled"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        next_json(&mut client).await,
        json!({"type": "payment_cancelled", "transactionId": "tx-2"})
    );
}

#[tokio::test]
async fn unknown_transaction_is_still_acknowledged() {
    let relay = Relay::start().await;

    let (status, body) = relay
        .confirm(json!({"transactionId": "never-registered", "status": "success"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Confirmation received"}));

    let (status, _) = relay.confirm(json!({})).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn second_confirmation_is_a_noop() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/").await;
    relay.register(&mut client, "tx-3", 1).await;

    let body = json!({"transactionId": "tx-3", "status": "success"});
    let _ = relay.confirm(body.clone()).await;
    let _ = next_json(&mut client).await;

    let (status, _) = relay.confirm(body).await;
    assert_eq!(status, 200);
    expect_silence(&mut client).await;
}

#[tokio::test]
async fn last_registration_wins() {
    let relay = Relay::start().await;
    let mut first = relay.connect("/").await;
    let mut second = relay.connect("/").await;

    relay.register(&mut first, "shared", 1).await;
    let Some(first_owner) = relay
        .service
        .registry()
        .owner(&transaction("shared"))
        .await
    else {
        panic!("first registration missing");
    };

    let frame = json!({"type": "register", "transactionId": "shared"}).to_string();
    if second.send(Message::text(frame)).await.is_err() {
        panic!("ws send failed");
    }
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while relay.service.registry().owner(&transaction("shared")).await == Some(first_owner) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "second registration never took over");

    let _ = relay
        .confirm(json!({"transactionId": "shared", "status": "success"}))
        .await;

    assert_eq!(
        next_json(&mut second).await,
        json!({"type": "payment_success", "transactionId": "shared"})
    );
    expect_silence(&mut first).await;
}

#[tokio::test]
async fn closed_connection_is_deregistered() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/").await;
    relay.register(&mut client, "tx-4", 1).await;

    let _ = client.close(None).await;
    drop(client);
    relay.wait_for_active(0).await;

    let (status, body) = relay
        .confirm(json!({"transactionId": "tx-4", "status": "success"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Confirmation received"}));
}

#[tokio::test]
async fn malformed_frames_do_not_close_the_connection() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/").await;

    for junk in ["{not json", r#"{"type":"hello"}"#] {
        if client.send(Message::text(junk.to_string())).await.is_err() {
            panic!("ws send failed");
        }
    }
    relay.register(&mut client, "tx-5", 1).await;

    let _ = relay
        .confirm(json!({"transactionId": "tx-5", "status": "success"}))
        .await;
    assert_eq!(
        next_json(&mut client).await,
        json!({"type": "payment_success", "transactionId": "tx-5"})
    );
}

#[tokio::test]
async fn binary_frames_are_read_as_text() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/").await;

    if client
        .send(Message::binary(vec![0xff, 0xfe, 0xfd]))
        .await
        .is_err()
    {
        panic!("ws send failed");
    }
    let frame = json!({"type": "register", "transactionId": "tx-bin"}).to_string();
    if client.send(Message::binary(frame.into_bytes())).await.is_err() {
        panic!("ws send failed");
    }
    relay.wait_for_active(1).await;

    let _ = relay
        .confirm(json!({"transactionId": "tx-bin", "status": "success"}))
        .await;
    assert_eq!(
        next_json(&mut client).await,
        json!({"type": "payment_success", "transactionId": "tx-bin"})
    );
}

#[tokio::test]
async fn confirmation_without_content_type_is_accepted() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/").await;
    relay.register(&mut client, "tx-raw", 1).await;

    let url = format!("http://{}/api/confirm-payment", relay.addr);
    let Ok(resp) = relay
        .http
        .post(&url)
        .body(r#"{"transactionId":"tx-raw","status":"success"}"#)
        .send()
        .await
    else {
        panic!("confirm request failed");
    };
    assert_eq!(resp.status().as_u16(), 200);
    let Ok(body) = resp.json::<Value>().await else {
        panic!("confirm response was not JSON");
    };
    assert_eq!(body, json!({"message": "Confirmation received"}));
    assert_eq!(
        next_json(&mut client).await,
        json!({"type": "payment_success", "transactionId": "tx-raw"})
    );

    for raw in ["", "transactionId=tx-raw&status=success"] {
        let Ok(resp) = relay.http.post(&url).body(raw).send().await else {
            panic!("confirm request failed");
        };
        assert_eq!(resp.status().as_u16(), 200);
    }
}

#[tokio::test]
async fn discovery_reports_not_ready_until_published() {
    let relay = Relay::start().await;

    let (status, _) = relay.get("/api/get-public-url").await;
    assert_eq!(status, 503);
    let (status, _) = relay.get("/api/get-ws-url").await;
    assert_eq!(status, 503);

    let _ = relay.service.endpoint().publish("https://shop-1.serveo.net");

    let (status, body) = relay.get("/api/get-public-url").await;
    assert_eq!(status, 200);
    let Ok(http) = serde_json::from_str::<Value>(&body) else {
        panic!("public url body is not JSON");
    };
    assert_eq!(http, json!({"url": "https://shop-1.serveo.net"}));

    let (status, body) = relay.get("/api/get-ws-url").await;
    assert_eq!(status, 200);
    let Ok(ws) = serde_json::from_str::<Value>(&body) else {
        panic!("ws url body is not JSON");
    };
    assert_eq!(ws, json!({"url": "wss://shop-1.serveo.net"}));
}

#[tokio::test]
async fn health_reports_registrations_and_readiness() {
    let relay = Relay::start().await;
    let mut client = relay.connect("/").await;
    relay.register(&mut client, "tx-6", 1).await;

    let (status, body) = relay.get("/health").await;
    assert_eq!(status, 200);
    let Ok(health) = serde_json::from_str::<Value>(&body) else {
        panic!("health body is not JSON");
    };
    assert_eq!(health.get("status"), Some(&json!("healthy")));
    assert_eq!(health.get("public_url_ready"), Some(&json!(false)));
    assert_eq!(health.get("active_transactions"), Some(&json!(1)));
}

#[tokio::test]
async fn root_serves_static_index_without_upgrade() {
    let relay = Relay::start().await;

    let (status, body) = relay.get("/").await;
    assert_eq!(status, 200);
    assert_eq!(body, INDEX_HTML);

    let (status, _) = relay.get("/missing.js").await;
    assert_eq!(status, 404);
}

fn transaction(raw: &str) -> checkout_relay::domain::TransactionId {
    let Some(id) = checkout_relay::domain::TransactionId::new(raw) else {
        panic!("valid transaction id");
    };
    id
}
