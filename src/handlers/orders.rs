use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{role_allowed, AuthContext, Role};
use crate::entities::order::OrderStatus;
use crate::errors::ServiceError;
use crate::services::orders::{
    CreateOrderRequest, OrderDetails, OrderListResponse, OrderResponse, UpdateOrderRequest,
};
use crate::{ApiResponse, AppState, ListQuery};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub delivered_volume: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub paid: bool,
}

pub async fn create_order(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ServiceError> {
    let order = state.services.orders.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

pub async fn list_orders(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<OrderListResponse>>, ServiceError> {
    let result = state
        .services
        .orders
        .list_orders(query.page, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn get_order(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderDetails>>, ServiceError> {
    let details = state
        .services
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;
    Ok(Json(ApiResponse::success(details)))
}

pub async fn update_order(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    require_role(&auth, &[Role::Admin, Role::Employee])?;
    let order = state.services.orders.update_order(id, request).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    require_role(&auth, &[Role::Admin, Role::Employee, Role::Driver])?;
    let target = OrderStatus::from_str(&request.status).ok_or_else(|| {
        ServiceError::ValidationError(format!("Unknown order status: {}", request.status))
    })?;
    let order = state
        .services
        .orders
        .transition(id, target, request.delivered_volume)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn assign_driver(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignDriverRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    require_role(&auth, &[Role::Admin, Role::Employee])?;
    let order = state
        .services
        .orders
        .assign_driver(id, request.driver_id)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn update_payment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    require_role(&auth, &[Role::Admin, Role::Employee])?;
    let order = state.services.orders.set_paid(id, request.paid).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn delete_order(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.orders.delete_order(id, auth.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn require_role(auth: &AuthContext, allowed: &[Role]) -> Result<(), ServiceError> {
    if !role_allowed(auth.role, allowed) {
        return Err(ServiceError::Forbidden(format!(
            "Role {} is not allowed to perform this action",
            auth.role.as_str()
        )));
    }
    Ok(())
}
