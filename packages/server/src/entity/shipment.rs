use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipment")]
pub struct Model {
    /// UUIDv7 primary key, so ids sort by creation time.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub recipient: String,
    pub address: String,
    /// Caller-understood unit, rendered as pounds.
    pub weight: f64,
    /// Shipping tier or carrier identifier.
    pub service: String,

    /// Public URL of the generated label. Set asynchronously after creation.
    pub label_reference: Option<String>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
