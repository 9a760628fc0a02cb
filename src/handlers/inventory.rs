use axum::{
    extract::{Path, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{role_allowed, AuthContext, Role};
use crate::errors::ServiceError;
use crate::services::inventory::WarehouseStockLine;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub product_id: Uuid,
    pub volume: Decimal,
}

/// Stock position of one (warehouse, product) pair: quantity on hand,
/// volume committed to open orders, and what remains orderable.
#[derive(Debug, Serialize)]
pub struct StockAvailability {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub committed: Decimal,
    pub available: Decimal,
}

pub async fn list_warehouse_stock(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(warehouse_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<WarehouseStockLine>>>, ServiceError> {
    let stock = state
        .services
        .inventory
        .list_for_warehouse(warehouse_id)
        .await?;
    Ok(Json(ApiResponse::success(stock)))
}

pub async fn get_stock_availability(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path((warehouse_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<StockAvailability>>, ServiceError> {
    let quantity = state
        .services
        .inventory
        .available_for(warehouse_id, product_id)
        .await?;
    let committed = state
        .services
        .selector
        .committed_volume(warehouse_id, product_id)
        .await?;

    Ok(Json(ApiResponse::success(StockAvailability {
        warehouse_id,
        product_id,
        quantity,
        committed,
        available: quantity - committed,
    })))
}

pub async fn restock_warehouse(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(warehouse_id): Path<Uuid>,
    Json(request): Json<RestockRequest>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    if !role_allowed(auth.role, &[Role::Admin, Role::Employee]) {
        return Err(ServiceError::Forbidden(format!(
            "Role {} is not allowed to restock warehouses",
            auth.role.as_str()
        )));
    }

    state
        .services
        .inventory
        .restock(warehouse_id, request.product_id, request.volume)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
