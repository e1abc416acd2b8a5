use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemLabelStore;
use tokio::net::TcpListener;
use tracing::{Level, info};

use shiptrack_server::config::AppConfig;
use shiptrack_server::consumers::consume_label_outcomes;
use shiptrack_server::state::AppState;
use shiptrack_server::store::SeaOrmShipmentStore;
use shiptrack_server::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()
        .context("Failed to load config (is SHIPTRACK__DATABASE__URL set?)")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    let labels = FilesystemLabelStore::new(config.labels.dir.clone())
        .await
        .with_context(|| format!("Failed to prepare label directory {:?}", config.labels.dir))?;
    info!(
        dir = %config.labels.dir.display(),
        public_base_url = %config.labels.public_base_url,
        merge_selection = ?config.labels.merge_selection,
        "Label storage ready"
    );

    let (state, outcomes) = AppState::new(
        config.clone(),
        Arc::new(SeaOrmShipmentStore::new(db)),
        Arc::new(labels),
    );
    tokio::spawn(consume_label_outcomes(outcomes));

    let app = build_router(state);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
