use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::store::{ShipmentStore, StoreError};

/// Attaches finished label references to their shipment records.
///
/// Best effort: failures are logged, never propagated.
#[derive(Clone)]
pub struct LabelUpdater {
    store: Arc<dyn ShipmentStore>,
}

impl LabelUpdater {
    pub fn new(store: Arc<dyn ShipmentStore>) -> Self {
        Self { store }
    }

    /// Returns whether the record now carries `reference`.
    pub async fn apply(&self, id: Uuid, reference: &str) -> bool {
        match self.store.attach_label_reference(id, reference).await {
            Ok(()) => {
                info!(shipment_id = %id, reference, "Shipment updated with label reference");
                true
            }
            Err(StoreError::NotFound(_)) => {
                warn!(shipment_id = %id, reference, "Shipment vanished before its label was attached");
                false
            }
            Err(e) => {
                error!(shipment_id = %id, error = %e, "Failed to attach label reference");
                false
            }
        }
    }
}
