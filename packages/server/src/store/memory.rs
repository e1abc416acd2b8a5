use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewShipment, Shipment, ShipmentStore, StoreError};

/// Process-local shipment store.
///
/// Holds records in insertion order; used by tests and database-less local runs.
#[derive(Default)]
pub struct InMemoryShipmentStore {
    shipments: RwLock<Vec<Shipment>>,
}

impl InMemoryShipmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first. Records sharing a timestamp keep reverse insertion order.
    async fn newest_first(&self, keep: impl Fn(&Shipment) -> bool) -> Vec<Shipment> {
        let mut shipments: Vec<Shipment> = self
            .shipments
            .read()
            .await
            .iter()
            .rev()
            .filter(|s| keep(s))
            .cloned()
            .collect();
        shipments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        shipments
    }
}

#[async_trait]
impl ShipmentStore for InMemoryShipmentStore {
    async fn insert_new(&self, new: NewShipment) -> Result<Shipment, StoreError> {
        let shipment = Shipment {
            id: Uuid::now_v7(),
            recipient: new.recipient,
            address: new.address,
            weight: new.weight,
            service: new.service,
            label_reference: None,
            created_at: Utc::now(),
        };
        self.shipments.write().await.push(shipment.clone());
        Ok(shipment)
    }

    async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<Shipment>, StoreError> {
        let mut shipments = self.newest_first(|_| true).await;
        if let Some(limit) = limit {
            shipments.truncate(limit as usize);
        }
        Ok(shipments)
    }

    async fn list_recent_labeled(&self, limit: u64) -> Result<Vec<Shipment>, StoreError> {
        let mut shipments = self
            .newest_first(|s| s.label_reference.is_some())
            .await;
        shipments.truncate(limit as usize);
        Ok(shipments)
    }

    async fn attach_label_reference(&self, id: Uuid, reference: &str) -> Result<(), StoreError> {
        let mut shipments = self.shipments.write().await;
        let shipment = shipments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;
        shipment.label_reference = Some(reference.to_string());
        Ok(())
    }
}
