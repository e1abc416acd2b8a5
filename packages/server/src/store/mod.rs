//! Shipment record persistence.

mod database;
mod memory;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

pub use database::SeaOrmShipmentStore;
pub use memory::InMemoryShipmentStore;

pub use crate::entity::shipment::Model as Shipment;
use crate::models::shipment::CreateShipmentRequest;

const REQUIRED_FIELDS_MESSAGE: &str = "recipient, address, weight, and service are required";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("shipment {0} not found")]
    NotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// A validated shipment, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShipment {
    pub recipient: String,
    pub address: String,
    pub weight: f64,
    pub service: String,
}

impl TryFrom<CreateShipmentRequest> for NewShipment {
    type Error = StoreError;

    /// Presence checks only: text must be non-blank, weight present and non-zero.
    fn try_from(req: CreateShipmentRequest) -> Result<Self, Self::Error> {
        let recipient = required_text(req.recipient);
        let address = required_text(req.address);
        let weight = req.weight.filter(|w| w.is_finite() && *w != 0.0);
        let service = required_text(req.service);

        match (recipient, address, weight, service) {
            (Some(recipient), Some(address), Some(weight), Some(service)) => Ok(Self {
                recipient,
                address,
                weight,
                service,
            }),
            (recipient, address, weight, service) => {
                let missing: Vec<&str> = [
                    ("recipient", recipient.is_none()),
                    ("address", address.is_none()),
                    ("weight", weight.is_none()),
                    ("service", service.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(StoreError::Validation(format!(
                    "{REQUIRED_FIELDS_MESSAGE} (missing: {})",
                    missing.join(", ")
                )))
            }
        }
    }
}

fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Shipment record storage.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Validate submitted fields and persist a new record with a fresh id,
    /// the current timestamp and no label reference.
    async fn insert(&self, fields: CreateShipmentRequest) -> Result<Shipment, StoreError> {
        let new = NewShipment::try_from(fields)?;
        self.insert_new(new).await
    }

    /// Persist an already validated shipment.
    async fn insert_new(&self, new: NewShipment) -> Result<Shipment, StoreError>;

    /// Records ordered newest first, bounded to `limit` when given.
    async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<Shipment>, StoreError>;

    /// The `limit` newest records that carry a label reference, newest first.
    async fn list_recent_labeled(&self, limit: u64) -> Result<Vec<Shipment>, StoreError>;

    /// Set the label reference of an existing record.
    ///
    /// Fails with [`StoreError::NotFound`] when no record has this id.
    async fn attach_label_reference(&self, id: Uuid, reference: &str) -> Result<(), StoreError>;
}
