use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::{NewShipment, Shipment, ShipmentStore, StoreError};
use crate::entity::shipment;

/// SeaORM-backed shipment store.
#[derive(Clone)]
pub struct SeaOrmShipmentStore {
    db: DatabaseConnection,
}

impl SeaOrmShipmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShipmentStore for SeaOrmShipmentStore {
    async fn insert_new(&self, new: NewShipment) -> Result<Shipment, StoreError> {
        let model = shipment::ActiveModel {
            id: Set(Uuid::now_v7()),
            recipient: Set(new.recipient),
            address: Set(new.address),
            weight: Set(new.weight),
            service: Set(new.service),
            label_reference: Set(None),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<Shipment>, StoreError> {
        let shipments = shipment::Entity::find()
            .order_by_desc(shipment::Column::CreatedAt)
            .order_by_desc(shipment::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(shipments)
    }

    async fn list_recent_labeled(&self, limit: u64) -> Result<Vec<Shipment>, StoreError> {
        let shipments = shipment::Entity::find()
            .filter(shipment::Column::LabelReference.is_not_null())
            .order_by_desc(shipment::Column::CreatedAt)
            .order_by_desc(shipment::Column::Id)
            .limit(Some(limit))
            .all(&self.db)
            .await?;
        Ok(shipments)
    }

    async fn attach_label_reference(&self, id: Uuid, reference: &str) -> Result<(), StoreError> {
        let result = shipment::Entity::update_many()
            .col_expr(
                shipment::Column::LabelReference,
                Expr::value(reference.to_string()),
            )
            .filter(shipment::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
