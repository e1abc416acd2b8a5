use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::shipment;

/// Shipment fields as submitted by a client.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateShipmentRequest {
    #[schema(example = "Jane Doe")]
    pub recipient: Option<String>,
    #[schema(example = "1 Main St, Springfield")]
    pub address: Option<String>,
    /// Weight in pounds.
    #[schema(example = 2.5)]
    pub weight: Option<f64>,
    #[schema(example = "Express")]
    pub service: Option<String>,
}

/// Response DTO for a single shipment.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    /// Shipment ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    pub recipient: String,
    pub address: String,
    pub weight: f64,
    pub service: String,
    /// Public URL of the label PDF. Absent until generation completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "http://localhost:4000/labels/label-01936f0e-1234-7abc-8000-000000000001.pdf")]
    pub label_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<shipment::Model> for ShipmentResponse {
    fn from(model: shipment::Model) -> Self {
        Self {
            id: model.id.to_string(),
            recipient: model.recipient,
            address: model.address,
            weight: model.weight,
            service: model.service,
            label_reference: model.label_reference,
            created_at: model.created_at,
        }
    }
}

/// Liveness probe response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "Server is working!")]
    pub message: &'static str,
}
