use std::sync::Arc;

use common::document::{LabelContent, render_label};
use common::storage::LabelStore;
use tracing::{info, instrument};

use super::{LabelError, label_file_name};
use crate::store::Shipment;

/// A written label artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelHandle {
    /// Artifact name inside the label store.
    pub name: String,
    /// Publicly resolvable URL of the artifact.
    pub reference: String,
}

/// Renders shipment labels and writes them under an id-derived name.
pub struct LabelGenerator {
    labels: Arc<dyn LabelStore>,
    public_base_url: String,
}

impl LabelGenerator {
    pub fn new(labels: Arc<dyn LabelStore>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            labels,
            public_base_url,
        }
    }

    /// Public URL under which the `/labels` route serves `name`.
    pub fn reference_for(&self, name: &str) -> String {
        format!("{}/labels/{}", self.public_base_url, name)
    }

    /// Render and write the label for `shipment`.
    ///
    /// The artifact name depends only on the shipment id, so generating again
    /// replaces the previous artifact.
    #[instrument(skip(self, shipment), fields(shipment_id = %shipment.id))]
    pub async fn generate(&self, shipment: &Shipment) -> Result<LabelHandle, LabelError> {
        let content = LabelContent {
            recipient: shipment.recipient.clone(),
            address: shipment.address.clone(),
            weight: shipment.weight,
            service: shipment.service.clone(),
        };
        let bytes = tokio::task::spawn_blocking(move || render_label(&content)).await??;

        let name = label_file_name(shipment.id);
        self.labels.put(&name, &bytes).await?;
        info!(artifact = %name, bytes = bytes.len(), "Label written");

        Ok(LabelHandle {
            reference: self.reference_for(&name),
            name,
        })
    }
}
