use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{role_allowed, Role};
use crate::db::DbPool;
use crate::entities::order::{
    self, Entity as OrderEntity, Model as OrderModel, OrderStatus,
};
use crate::entities::product::{Entity as ProductEntity, UnitOfMeasure};
use crate::entities::user::Entity as UserEntity;
use crate::entities::vehicle::Entity as VehicleEntity;
use crate::entities::warehouse::Entity as WarehouseEntity;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::capacity::CapacityValidator;
use crate::services::inventory::InventoryService;
use crate::services::pricing::PricingService;
use crate::services::warehouses::WarehouseSelector;

/// Request to place a fuel order. When `warehouse_id` is absent a warehouse
/// is selected automatically; when `unit_price` is absent the catalog price
/// is used.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub requested_volume: Decimal,
    #[validate(length(min = 1, message = "Delivery location is required"))]
    pub delivery_location: String,
    pub warehouse_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub unit_price: Option<Decimal>,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Administrative field corrections. This path intentionally bypasses the
/// inventory ledger: volume, product and warehouse are immutable here, and
/// nothing is re-reserved or released.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    pub delivery_location: Option<String>,
    pub delivered_volume: Option<Decimal>,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub warehouse_id: Uuid,
    pub requested_volume: Decimal,
    pub delivered_volume: Option<Decimal>,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub delivery_location: String,
    pub status: String,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub paid: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// An order with the reference names a client wants to display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub warehouse_name: Option<String>,
    pub driver_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Coordinates the order lifecycle with the inventory ledger, pricing
/// engine and warehouse selector. Orders are only ever created through
/// `create_order`, which couples the reservation and the order insert in a
/// single transaction.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    inventory: InventoryService,
    pricing: PricingService,
    selector: WarehouseSelector,
    capacity: CapacityValidator,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(
        db: Arc<DbPool>,
        inventory: InventoryService,
        pricing: PricingService,
        selector: WarehouseSelector,
        capacity: CapacityValidator,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            inventory,
            pricing,
            selector,
            capacity,
            event_sender,
        }
    }

    /// Places an order: validates the request, selects or validates the
    /// warehouse, resolves the price, re-verifies availability, reserves
    /// inventory and persists the order — the reservation and the insert
    /// share one transaction, so no failure path leaves a partial
    /// reservation behind.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, product_id = %request.product_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request.validate()?;

        let volume = request.requested_volume;
        if volume <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Requested volume must be positive".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (request.window_start, request.window_end) {
            if end < start {
                return Err(ServiceError::ValidationError(
                    "Delivery window end precedes its start".to_string(),
                ));
            }
        }

        let product = ProductEntity::find_by_id(request.product_id)
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::ProductNotFound(request.product_id))?;
        let unit = UnitOfMeasure::from_str(&product.unit).ok_or_else(|| {
            ServiceError::InternalError(format!(
                "Product {} has unknown unit {}",
                product.id, product.unit
            ))
        })?;

        UserEntity::find_by_id(request.customer_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", request.customer_id))
            })?;

        let warehouse_id = match request.warehouse_id {
            Some(id) => {
                WarehouseEntity::find_by_id(id)
                    .one(&*self.db)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Warehouse {} not found", id))
                    })?;
                id
            }
            None => {
                self.selector
                    .select_warehouse(request.product_id, volume)
                    .await?
            }
        };

        if let Some(driver_id) = request.driver_id {
            self.validate_driver(driver_id, volume, unit).await?;
        }

        let unit_price = self
            .pricing
            .resolve_unit_price(request.product_id, request.unit_price)
            .await?;

        // Same committed-volume accounting the selector uses; the atomic
        // reserve below remains the final arbiter under races.
        let available = self
            .selector
            .available_volume(warehouse_id, request.product_id)
            .await?;
        if available < volume {
            return Err(ServiceError::InsufficientStock {
                requested: volume,
                available,
            });
        }

        let breakdown = self.pricing.compute_total(unit_price, volume);
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        self.inventory
            .reserve_with(&txn, warehouse_id, request.product_id, volume)
            .await?;

        let order_model = order::ActiveModel {
            id: Set(order_id),
            customer_id: Set(request.customer_id),
            product_id: Set(request.product_id),
            driver_id: Set(request.driver_id),
            warehouse_id: Set(warehouse_id),
            requested_volume: Set(volume),
            delivered_volume: Set(None),
            window_start: Set(request.window_start),
            window_end: Set(request.window_end),
            delivery_location: Set(request.delivery_location.clone()),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            unit_price: Set(unit_price),
            total: Set(breakdown.total),
            paid: Set(false),
            payment_method: Set(request.payment_method.clone()),
            notes: Set(request.notes.clone()),
            created_at: Set(now),
            delivered_at: Set(None),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(order_id = %order_id, warehouse_id = %warehouse_id, volume = %volume, "Order created");
        self.emit(Event::InventoryReserved {
            warehouse_id,
            product_id: request.product_id,
            volume,
        })
        .await;
        self.emit(Event::OrderCreated(order_id)).await;

        Ok(model_to_response(order_model))
    }

    /// Retrieves an order with reference names joined in.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderDetails>, ServiceError> {
        let Some(order) = OrderEntity::find_by_id(order_id).one(&*self.db).await? else {
            return Ok(None);
        };

        let customer_name = UserEntity::find_by_id(order.customer_id)
            .one(&*self.db)
            .await?
            .map(|u| u.name);
        let product_name = ProductEntity::find_by_id(order.product_id)
            .one(&*self.db)
            .await?
            .map(|p| p.name);
        let warehouse_name = WarehouseEntity::find_by_id(order.warehouse_id)
            .one(&*self.db)
            .await?
            .map(|w| w.name);
        let driver_name = match order.driver_id {
            Some(driver_id) => UserEntity::find_by_id(driver_id)
                .one(&*self.db)
                .await?
                .map(|u| u.name),
            None => None,
        };

        Ok(Some(OrderDetails {
            order: model_to_response(order),
            customer_name,
            product_name,
            warehouse_name,
            driver_name,
        }))
    }

    /// Lists orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }

        let paginator = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page - 1).await?;

        Ok(OrderListResponse {
            orders: orders.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Assigns a driver to an order after checking the driver role, vehicle
    /// assignment, and vehicle capacity against the order volume.
    /// Assignment does not change the order's state.
    #[instrument(skip(self))]
    pub async fn assign_driver(
        &self,
        order_id: Uuid,
        driver_id: Uuid,
    ) -> Result<OrderResponse, ServiceError> {
        let order = self.find_order(order_id).await?;

        let product = ProductEntity::find_by_id(order.product_id)
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::ProductNotFound(order.product_id))?;
        let unit = UnitOfMeasure::from_str(&product.unit).ok_or_else(|| {
            ServiceError::InternalError(format!(
                "Product {} has unknown unit {}",
                product.id, product.unit
            ))
        })?;

        self.validate_driver(driver_id, order.requested_volume, unit)
            .await?;

        let mut active: order::ActiveModel = order.into();
        active.driver_id = Set(Some(driver_id));
        let updated = active.update(&*self.db).await?;

        info!(order_id = %order_id, driver_id = %driver_id, "Driver assigned");
        self.emit(Event::DriverAssigned {
            order_id,
            driver_id,
        })
        .await;

        Ok(model_to_response(updated))
    }

    /// Advances the order state machine. Transitioning to `delivered`
    /// records the delivered volume (the requested volume unless overridden)
    /// and the delivery timestamp.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        order_id: Uuid,
        target: OrderStatus,
        delivered_volume: Option<Decimal>,
    ) -> Result<OrderResponse, ServiceError> {
        let order = self.find_order(order_id).await?;

        let current = OrderStatus::from_str(&order.status).ok_or_else(|| {
            ServiceError::InternalError(format!(
                "Order {} has unknown status {}",
                order.id, order.status
            ))
        })?;

        if !current.can_transition_to(target) {
            return Err(ServiceError::InvalidTransition {
                from: order.status.clone(),
                to: target.as_str().to_string(),
            });
        }

        let old_status = order.status.clone();
        let requested_volume = order.requested_volume;
        let mut active: order::ActiveModel = order.into();
        active.status = Set(target.as_str().to_string());
        if target == OrderStatus::Delivered {
            active.delivered_volume = Set(Some(delivered_volume.unwrap_or(requested_volume)));
            active.delivered_at = Set(Some(Utc::now()));
        }
        let updated = active.update(&*self.db).await?;

        info!(order_id = %order_id, from = %old_status, to = %target.as_str(), "Order transitioned");
        self.emit(Event::OrderStatusChanged {
            order_id,
            old_status,
            new_status: target.as_str().to_string(),
        })
        .await;

        Ok(model_to_response(updated))
    }

    /// Flips the paid flag. Independent of the state machine.
    #[instrument(skip(self))]
    pub async fn set_paid(&self, order_id: Uuid, paid: bool) -> Result<OrderResponse, ServiceError> {
        let order = self.find_order(order_id).await?;

        let mut active: order::ActiveModel = order.into();
        active.paid = Set(paid);
        let updated = active.update(&*self.db).await?;

        self.emit(Event::OrderPaymentUpdated { order_id, paid }).await;
        Ok(model_to_response(updated))
    }

    /// Applies administrative field corrections without touching the
    /// inventory ledger.
    #[instrument(skip(self, request))]
    pub async fn update_order(
        &self,
        order_id: Uuid,
        request: UpdateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        if let Some(location) = &request.delivery_location {
            if location.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Delivery location must not be empty".to_string(),
                ));
            }
        }

        let order = self.find_order(order_id).await?;

        let mut active: order::ActiveModel = order.into();
        if let Some(location) = request.delivery_location {
            active.delivery_location = Set(location);
        }
        if let Some(volume) = request.delivered_volume {
            active.delivered_volume = Set(Some(volume));
        }
        if let Some(start) = request.window_start {
            active.window_start = Set(Some(start));
        }
        if let Some(end) = request.window_end {
            active.window_end = Set(Some(end));
        }
        if let Some(method) = request.payment_method {
            active.payment_method = Set(Some(method));
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        let updated = active.update(&*self.db).await?;

        Ok(model_to_response(updated))
    }

    /// Deletes an order. Unless the order was already delivered, its
    /// reserved volume is returned to the warehouse first; a failed release
    /// is logged and the deletion proceeds anyway (best-effort compensation,
    /// surfaced in the logs rather than hidden). Release and delete share
    /// one transaction so no new reservation can interleave between them.
    #[instrument(skip(self))]
    pub async fn delete_order(
        &self,
        order_id: Uuid,
        caller_role: Role,
    ) -> Result<(), ServiceError> {
        if !role_allowed(caller_role, &[Role::Admin, Role::Employee]) {
            return Err(ServiceError::Forbidden(format!(
                "Role {} may not delete orders",
                caller_role.as_str()
            )));
        }

        let txn = self.db.begin().await?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let mut released = None;
        if OrderStatus::from_str(&order.status) != Some(OrderStatus::Delivered) {
            match self
                .inventory
                .release_with(&txn, order.warehouse_id, order.product_id, order.requested_volume)
                .await
            {
                Ok(()) => released = Some(order.requested_volume),
                Err(e) => {
                    error!(
                        order_id = %order_id,
                        warehouse_id = %order.warehouse_id,
                        error = %e,
                        "Failed to restore inventory while deleting order; deleting anyway"
                    );
                }
            }
        }

        let warehouse_id = order.warehouse_id;
        let product_id = order.product_id;
        OrderEntity::delete_by_id(order_id).exec(&txn).await?;
        txn.commit().await?;

        if let Some(volume) = released {
            self.emit(Event::InventoryReleased {
                warehouse_id,
                product_id,
                volume,
            })
            .await;
        }
        self.emit(Event::OrderDeleted(order_id)).await;

        Ok(())
    }

    async fn find_order(&self, order_id: Uuid) -> Result<OrderModel, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }

    async fn validate_driver(
        &self,
        driver_id: Uuid,
        volume: Decimal,
        unit: UnitOfMeasure,
    ) -> Result<(), ServiceError> {
        let driver = UserEntity::find_by_id(driver_id)
            .one(&*self.db)
            .await?
            .filter(|u| u.role == Role::Driver.as_str())
            .ok_or_else(|| ServiceError::NotFound(format!("Driver {} not found", driver_id)))?;

        let vehicle_id = driver
            .vehicle_id
            .ok_or(ServiceError::NoVehicleAssigned(driver_id))?;

        let vehicle = VehicleEntity::find_by_id(vehicle_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vehicle {} not found", vehicle_id)))?;

        self.capacity
            .check_vehicle_capacity(vehicle.capacity_liters, volume, unit)
    }

    async fn emit(&self, event: Event) {
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "Failed to send order event");
        }
    }
}

fn model_to_response(model: OrderModel) -> OrderResponse {
    OrderResponse {
        id: model.id,
        customer_id: model.customer_id,
        product_id: model.product_id,
        driver_id: model.driver_id,
        warehouse_id: model.warehouse_id,
        requested_volume: model.requested_volume,
        delivered_volume: model.delivered_volume,
        window_start: model.window_start,
        window_end: model.window_end,
        delivery_location: model.delivery_location,
        status: model.status,
        unit_price: model.unit_price,
        total: model.total,
        paid: model.paid,
        payment_method: model.payment_method,
        notes: model.notes,
        created_at: model.created_at,
        delivered_at: model.delivered_at,
    }
}
