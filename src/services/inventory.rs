use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::inventory_line::{self, Entity as InventoryLineEntity};
use crate::entities::product;
use crate::entities::warehouse::Entity as WarehouseEntity;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::capacity::CapacityValidator;

#[derive(FromQueryResult)]
struct QuantitySum {
    total: Option<Decimal>,
}

/// One stock line of a warehouse, joined with its product for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseStockLine {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub fuel_type: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
}

/// The inventory ledger: owns all writes to inventory lines.
///
/// `reserve` is a single conditional decrement at the storage layer, so two
/// concurrent reservations against the same line can never both succeed past
/// the available quantity. There is deliberately no read-check-write here.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Atomically decrements the line quantity if at least `volume` is on
    /// hand; fails with `InsufficientStock` (reporting the actual available
    /// amount) otherwise, leaving the line unchanged.
    #[instrument(skip(self))]
    pub async fn reserve(
        &self,
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    ) -> Result<(), ServiceError> {
        self.reserve_with(&*self.db, warehouse_id, product_id, volume)
            .await?;
        self.emit(Event::InventoryReserved {
            warehouse_id,
            product_id,
            volume,
        })
        .await;
        Ok(())
    }

    /// Reservation against an explicit connection, letting order creation
    /// run the reserve and the order insert inside one transaction.
    pub async fn reserve_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    ) -> Result<(), ServiceError> {
        if volume <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Reservation volume must be positive".to_string(),
            ));
        }

        // UPDATE inventory_lines SET quantity = quantity - ?
        // WHERE warehouse_id = ? AND product_id = ? AND quantity >= ?
        let result = InventoryLineEntity::update_many()
            .col_expr(
                inventory_line::Column::Quantity,
                Expr::col(inventory_line::Column::Quantity).sub(volume),
            )
            .filter(inventory_line::Column::WarehouseId.eq(warehouse_id))
            .filter(inventory_line::Column::ProductId.eq(product_id))
            .filter(inventory_line::Column::Quantity.gte(volume))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            let available = self
                .available_for_with(conn, warehouse_id, product_id)
                .await?;
            return Err(ServiceError::InsufficientStock {
                requested: volume,
                available,
            });
        }

        Ok(())
    }

    /// Returns `volume` to the line. Compensation path: always succeeds,
    /// with no upper-bound check against warehouse capacity. If the line has
    /// been removed in the meantime a fresh one is created.
    #[instrument(skip(self))]
    pub async fn release(
        &self,
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    ) -> Result<(), ServiceError> {
        self.release_with(&*self.db, warehouse_id, product_id, volume)
            .await?;
        self.emit(Event::InventoryReleased {
            warehouse_id,
            product_id,
            volume,
        })
        .await;
        Ok(())
    }

    pub async fn release_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    ) -> Result<(), ServiceError> {
        let result = InventoryLineEntity::update_many()
            .col_expr(
                inventory_line::Column::Quantity,
                Expr::col(inventory_line::Column::Quantity).add(volume),
            )
            .filter(inventory_line::Column::WarehouseId.eq(warehouse_id))
            .filter(inventory_line::Column::ProductId.eq(product_id))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            let line = inventory_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                warehouse_id: Set(warehouse_id),
                product_id: Set(product_id),
                quantity: Set(volume),
                received_at: Set(Utc::now()),
            };
            line.insert(conn).await?;
        }

        Ok(())
    }

    /// Adds stock, merging into the existing line or creating one on first
    /// addition. Fails with `CapacityExceeded` (carrying the deficit) when
    /// the warehouse cannot hold the extra volume. Capacity check and write
    /// run in one transaction.
    #[instrument(skip(self))]
    pub async fn restock(
        &self,
        warehouse_id: Uuid,
        product_id: Uuid,
        volume: Decimal,
    ) -> Result<(), ServiceError> {
        if volume <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Restock volume must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let warehouse = WarehouseEntity::find_by_id(warehouse_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Warehouse {} not found", warehouse_id))
            })?;

        let used = Self::warehouse_usage(&txn, warehouse_id).await?;
        CapacityValidator::check_warehouse_capacity(warehouse.total_capacity, used, volume)?;

        let existing = InventoryLineEntity::find()
            .filter(inventory_line::Column::WarehouseId.eq(warehouse_id))
            .filter(inventory_line::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?;

        match existing {
            Some(line) => {
                let new_quantity = line.quantity + volume;
                let mut active: inventory_line::ActiveModel = line.into();
                active.quantity = Set(new_quantity);
                active.update(&txn).await?;
            }
            None => {
                let line = inventory_line::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    warehouse_id: Set(warehouse_id),
                    product_id: Set(product_id),
                    quantity: Set(volume),
                    received_at: Set(Utc::now()),
                };
                line.insert(&txn).await?;
            }
        }

        txn.commit().await?;

        self.emit(Event::InventoryRestocked {
            warehouse_id,
            product_id,
            volume,
        })
        .await;

        Ok(())
    }

    /// Current line quantity, 0 when no line exists.
    #[instrument(skip(self))]
    pub async fn available_for(
        &self,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        self.available_for_with(&*self.db, warehouse_id, product_id)
            .await
    }

    pub async fn available_for_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        let line = InventoryLineEntity::find()
            .filter(inventory_line::Column::WarehouseId.eq(warehouse_id))
            .filter(inventory_line::Column::ProductId.eq(product_id))
            .one(conn)
            .await?;

        Ok(line.map(|l| l.quantity).unwrap_or(Decimal::ZERO))
    }

    /// All stock lines of a warehouse with their product details.
    #[instrument(skip(self))]
    pub async fn list_for_warehouse(
        &self,
        warehouse_id: Uuid,
    ) -> Result<Vec<WarehouseStockLine>, ServiceError> {
        let lines = InventoryLineEntity::find()
            .filter(inventory_line::Column::WarehouseId.eq(warehouse_id))
            .find_also_related(product::Entity)
            .all(&*self.db)
            .await?;

        let stock = lines
            .into_iter()
            .filter_map(|(line, product)| {
                product.map(|p| WarehouseStockLine {
                    id: line.id,
                    warehouse_id: line.warehouse_id,
                    product_id: line.product_id,
                    product_name: p.name,
                    fuel_type: p.fuel_type,
                    unit: p.unit,
                    unit_price: p.unit_price,
                    quantity: line.quantity,
                })
            })
            .collect();

        Ok(stock)
    }

    /// Sum of all line quantities in a warehouse.
    pub async fn warehouse_usage<C: ConnectionTrait>(
        conn: &C,
        warehouse_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        let row = InventoryLineEntity::find()
            .select_only()
            .column_as(Expr::col(inventory_line::Column::Quantity).sum(), "total")
            .filter(inventory_line::Column::WarehouseId.eq(warehouse_id))
            .into_model::<QuantitySum>()
            .one(conn)
            .await?;

        Ok(row.and_then(|r| r.total).unwrap_or(Decimal::ZERO))
    }

    async fn emit(&self, event: Event) {
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "Failed to send inventory event");
        }
    }
}
