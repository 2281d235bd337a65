#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode as AxumStatus};
use axum::routing::post;
use axum::{Json, Router};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use bizflow::config::Config;
use bizflow::state::SharedState;

pub const SERVICE_KEY: &str = "test-service-key-that-is-long-enough";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
    pub state: SharedState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn read(resp: reqwest::Response) -> (Value, StatusCode) {
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(SERVICE_KEY)
            .send()
            .await
            .expect("get request failed");
        Self::read(resp).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(SERVICE_KEY)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        Self::read(resp).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(SERVICE_KEY)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        Self::read(resp).await
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(SERVICE_KEY)
            .send()
            .await
            .expect("delete request failed");
        Self::read(resp).await
    }

    /// Call the webhooks function with an action body.
    pub async fn webhook_action(&self, body: Value) -> (Value, StatusCode) {
        self.post("/functions/v1/webhooks", &body).await
    }

    pub async fn create_column(&self, title: &str, position: i32, flags: (bool, bool)) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/kanban/columns",
                &json!({
                    "title": title,
                    "position": position,
                    "is_completion": flags.0,
                    "is_cancellation": flags.1,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create column failed: {body}");
        body
    }

    /// Backlog, Doing, Review, Done (completion), Cancelled (cancellation).
    pub async fn create_board(&self) -> Vec<Value> {
        vec![
            self.create_column("Backlog", 0, (false, false)).await,
            self.create_column("Doing", 1, (false, false)).await,
            self.create_column("Review", 2, (false, false)).await,
            self.create_column("Done", 3, (true, false)).await,
            self.create_column("Cancelled", 4, (false, true)).await,
        ]
    }

    pub async fn create_project(&self, name: &str) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/projects",
                &json!({ "name": name, "client_name": "Acme", "total_value": 1200.0 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create project failed: {body}");
        body
    }

    pub async fn create_stage(&self, project_id: &str, name: &str, position: i32) -> Value {
        let (body, status) = self
            .post(
                &format!("/api/v1/projects/{project_id}/stages"),
                &json!({ "name": name, "position": position, "value": 300.0 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create stage failed: {body}");
        body
    }

    pub async fn stages(&self, project_id: &str) -> Vec<Value> {
        let (body, status) = self
            .get(&format!("/api/v1/projects/{project_id}/stages"))
            .await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().cloned().unwrap_or_default()
    }

    pub async fn register_webhook(&self, url: &str, events: &[&str]) -> Value {
        let (body, status) = self
            .webhook_action(json!({
                "action": "register",
                "name": "Receiver",
                "url": url,
                "events": events,
            }))
            .await;
        assert_eq!(status, StatusCode::OK, "register webhook failed: {body}");
        body["webhook"].clone()
    }

    pub async fn queue_len(&self) -> i64 {
        bizflow::db::webhook_queue::count(&self.pool)
            .await
            .expect("count queue")
    }
}

/// A request captured by a [`Receiver`].
#[derive(Debug, Clone)]
pub struct Received {
    pub event: Option<String>,
    pub body: Value,
}

/// Local HTTP server standing in for a webhook target.
pub struct Receiver {
    pub addr: SocketAddr,
    pub received: Arc<Mutex<Vec<Received>>>,
}

impl Receiver {
    pub fn url(&self) -> String {
        format!("http://{}/hook", self.addr)
    }

    pub async fn received(&self) -> Vec<Received> {
        self.received.lock().await.clone()
    }
}

struct ReceiverState {
    status: AxumStatus,
    received: Arc<Mutex<Vec<Received>>>,
}

async fn receive(
    State(state): State<Arc<ReceiverState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (AxumStatus, &'static str) {
    let event = headers
        .get("x-webhook-event")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.received.lock().await.push(Received { event, body });
    (state.status, "received")
}

/// Start a receiver that answers every POST to `/hook` with `status`.
pub async fn spawn_receiver(status: u16) -> Receiver {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(ReceiverState {
        status: AxumStatus::from_u16(status).expect("valid status"),
        received: received.clone(),
    });

    let app = Router::new()
        .route("/hook", post(receive))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind receiver");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Receiver failed");
    });

    Receiver { addr, received }
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("bizflow_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        service_key: SERVICE_KEY.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        worker_count: 1,
        poll_interval_secs: 1,
        queue_batch_size: 10,
        webhook_timeout_secs: 5,
    };

    let (app, state) = bizflow::build_app(pool.clone(), config).expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
        state,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
