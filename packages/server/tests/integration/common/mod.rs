use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ::common::storage::FilesystemLabelStore;
use async_trait::async_trait;
use reqwest::Client;
use sea_orm::DbErr;
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use shiptrack_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, LabelConfig, MergeSelection, ServerConfig,
    ShipmentConfig,
};
use shiptrack_server::consumers::consume_label_outcomes;
use shiptrack_server::state::AppState;
use shiptrack_server::store::{
    InMemoryShipmentStore, NewShipment, Shipment, ShipmentStore, StoreError,
};

pub mod routes {
    pub const SHIPMENTS: &str = "/api/shipments";
    pub const MERGE_RECENT: &str = "/api/shipments/merge-recent";
    pub const HEALTH: &str = "/api/health";

    pub fn label(filename: &str) -> String {
        format!("/labels/{filename}")
    }
}

/// A shipment store whose database is unreachable.
pub struct FailingShipmentStore;

fn unavailable() -> StoreError {
    StoreError::Database(DbErr::Custom("database unavailable".to_string()))
}

#[async_trait]
impl ShipmentStore for FailingShipmentStore {
    async fn insert_new(&self, _new: NewShipment) -> Result<Shipment, StoreError> {
        Err(unavailable())
    }

    async fn list_recent(&self, _limit: Option<u64>) -> Result<Vec<Shipment>, StoreError> {
        Err(unavailable())
    }

    async fn list_recent_labeled(&self, _limit: u64) -> Result<Vec<Shipment>, StoreError> {
        Err(unavailable())
    }

    async fn attach_label_reference(&self, _id: Uuid, _reference: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

/// How long a test waits for a background label before giving up.
const LABEL_TIMEOUT: Duration = Duration::from_secs(10);

/// A running test server backed by the in-memory shipment store and a
/// temporary label directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub labels_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    /// Raw response body.
    pub bytes: Vec<u8>,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a tweaked configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        Self::spawn_with_store(Arc::new(InMemoryShipmentStore::new()), configure).await
    }

    /// Spawn on top of the given shipment store.
    pub async fn spawn_with_store(
        store: Arc<dyn ShipmentStore>,
        configure: impl FnOnce(&mut AppConfig),
    ) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();
        let labels_dir = tempfile::tempdir().expect("Failed to create label directory");

        let mut config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: addr.port(),
                cors: CorsConfig {
                    allow_origins: vec!["http://127.0.0.1:5500".to_string()],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "unused://in-memory".to_string(),
            },
            labels: LabelConfig {
                dir: labels_dir.path().to_path_buf(),
                public_base_url: format!("http://{addr}"),
                merge_window: 5,
                merge_selection: MergeSelection::Records,
                merged_name: "merged_labels.pdf".to_string(),
            },
            shipments: ShipmentConfig { list_limit: 5 },
        };
        configure(&mut config);

        let labels = FilesystemLabelStore::new(config.labels.dir.clone())
            .await
            .expect("Failed to open label store");
        let (state, outcomes) = AppState::new(config, store, Arc::new(labels));
        tokio::spawn(consume_label_outcomes(outcomes));

        let app = shiptrack_server::build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            labels_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Create a shipment and return its id.
    pub async fn create_shipment(&self, recipient: &str) -> String {
        let res = self
            .post_json(
                routes::SHIPMENTS,
                &serde_json::json!({
                    "recipient": recipient,
                    "address": "1 Main St, Springfield",
                    "weight": 2.5,
                    "service": "Express",
                }),
            )
            .await;
        assert_eq!(res.status, 200, "Create failed: {}", res.text());

        res.body["id"]
            .as_str()
            .expect("Create response has no id")
            .to_string()
    }

    /// Poll the listing until shipment `id` carries a label reference.
    pub async fn wait_for_label(&self, id: &str) -> String {
        let deadline = tokio::time::Instant::now() + LABEL_TIMEOUT;
        loop {
            let res = self.get(routes::SHIPMENTS).await;
            assert_eq!(res.status, 200, "List failed: {}", res.text());

            let reference = res
                .body
                .as_array()
                .into_iter()
                .flatten()
                .find(|shipment| shipment["id"] == id)
                .and_then(|shipment| shipment["labelReference"].as_str());
            if let Some(reference) = reference {
                return reference.to_string();
            }

            assert!(
                tokio::time::Instant::now() < deadline,
                "Label for shipment {id} was not attached in time"
            );
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let header = |name: reqwest::header::HeaderName| {
            res.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let content_disposition = header(reqwest::header::CONTENT_DISPOSITION);
        let bytes = res
            .bytes()
            .await
            .expect("Failed to read response body")
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Self {
            status,
            content_type,
            content_disposition,
            bytes,
            body,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
