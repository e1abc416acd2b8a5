use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// How `merge-recent` picks its source labels.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeSelection {
    /// The most recent shipments that carry a label reference.
    #[default]
    Records,
    /// The last `label-*.pdf` files in ascending name order. Only
    /// chronological when shipment ids sort by creation time.
    Filename,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LabelConfig {
    /// Directory holding generated and merged label artifacts.
    pub dir: PathBuf,
    /// Externally reachable address that `/labels/...` is served under.
    pub public_base_url: String,
    /// Number of labels `merge-recent` combines.
    pub merge_window: usize,
    #[serde(default)]
    pub merge_selection: MergeSelection,
    /// Fixed name of the merged artifact, overwritten on every merge.
    pub merged_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShipmentConfig {
    /// Upper bound on listed shipments. `0` lists everything.
    pub list_limit: u64,
}

impl ShipmentConfig {
    pub fn limit(&self) -> Option<u64> {
        (self.list_limit > 0).then_some(self.list_limit)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub labels: LabelConfig,
    pub shipments: ShipmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SHIPTRACK__DATABASE__URL)
            .add_source(
                Environment::with_prefix("SHIPTRACK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults for every key except `database.url`, which has none.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4000)?
            .set_default("server.cors.allow_origins", vec!["http://127.0.0.1:5500"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("labels.dir", "./labels")?
            .set_default("labels.public_base_url", "http://localhost:4000")?
            .set_default("labels.merge_window", 5)?
            .set_default("labels.merge_selection", "records")?
            .set_default("labels.merged_name", "merged_labels.pdf")?
            .set_default("shipments.list_limit", 5)
    }
}
