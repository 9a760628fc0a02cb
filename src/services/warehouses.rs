use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::inventory_line::{self, Entity as InventoryLineEntity};
use crate::entities::order::{self, Entity as OrderEntity, OrderStatus};
use crate::errors::ServiceError;

#[derive(FromQueryResult)]
struct VolumeSum {
    total: Option<Decimal>,
}

/// Picks a warehouse for an order when the caller did not name one.
///
/// Availability is computed as line quantity minus committed volume (the sum
/// of requested volumes of open orders against the same line). Order
/// creation's stock re-verification uses the same helpers, so the selector
/// and the validation step can never disagree on what is available.
#[derive(Clone)]
pub struct WarehouseSelector {
    db: Arc<DbPool>,
}

impl WarehouseSelector {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Sum of requested volumes of open (pending or in-transit) orders
    /// against a (warehouse, product) pair.
    pub async fn committed_volume(
        &self,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        self.committed_volume_with(&*self.db, warehouse_id, product_id)
            .await
    }

    pub async fn committed_volume_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        let row = OrderEntity::find()
            .select_only()
            .column_as(Expr::col(order::Column::RequestedVolume).sum(), "total")
            .filter(order::Column::WarehouseId.eq(warehouse_id))
            .filter(order::Column::ProductId.eq(product_id))
            .filter(
                order::Column::Status.is_in([
                    OrderStatus::Pending.as_str(),
                    OrderStatus::InTransit.as_str(),
                ]),
            )
            .into_model::<VolumeSum>()
            .one(conn)
            .await?;

        Ok(row.and_then(|r| r.total).unwrap_or(Decimal::ZERO))
    }

    /// Line quantity minus committed volume. May be negative when open
    /// orders outnumber the stock on hand.
    pub async fn available_volume(
        &self,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        let line = InventoryLineEntity::find()
            .filter(inventory_line::Column::WarehouseId.eq(warehouse_id))
            .filter(inventory_line::Column::ProductId.eq(product_id))
            .one(&*self.db)
            .await?;
        let quantity = line.map(|l| l.quantity).unwrap_or(Decimal::ZERO);

        let committed = self.committed_volume(warehouse_id, product_id).await?;
        Ok(quantity - committed)
    }

    /// Returns the warehouse with the most available stock for the product,
    /// among those that can cover `volume`. Ties break toward the lowest
    /// warehouse id so the choice is deterministic.
    #[instrument(skip(self))]
    pub async fn select_warehouse(
        &self,
        product_id: Uuid,
        volume: Decimal,
    ) -> Result<Uuid, ServiceError> {
        let lines = InventoryLineEntity::find()
            .filter(inventory_line::Column::ProductId.eq(product_id))
            .all(&*self.db)
            .await?;

        let mut candidates: Vec<(Uuid, Decimal)> = Vec::with_capacity(lines.len());
        for line in lines {
            let committed = self.committed_volume(line.warehouse_id, product_id).await?;
            let available = line.quantity - committed;
            if available >= volume {
                candidates.push((line.warehouse_id, available));
            }
        }

        candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        candidates
            .first()
            .map(|(warehouse_id, _)| *warehouse_id)
            .ok_or(ServiceError::NoWarehouseAvailable {
                product_id,
                requested: volume,
            })
    }
}
