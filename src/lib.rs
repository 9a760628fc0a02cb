//! Fuel delivery order API: order placement with atomic inventory
//! reservation, warehouse auto-selection, tax-inclusive pricing, and a
//! strict order lifecycle state machine.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::AppServices;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let services = AppServices::build(db.clone(), &config, event_sender.clone());
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}

/// Common query parameters for list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(handlers::orders::create_order))
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id", put(handlers::orders::update_order))
        .route("/orders/:id", delete(handlers::orders::delete_order))
        .route("/orders/:id/status", post(handlers::orders::update_order_status))
        .route("/orders/:id/driver", post(handlers::orders::assign_driver))
        .route("/orders/:id/payment", post(handlers::orders::update_payment))
        .route(
            "/warehouses/:id/stock",
            get(handlers::inventory::list_warehouse_stock),
        )
        .route(
            "/warehouses/:id/stock",
            post(handlers::inventory::restock_warehouse),
        )
        .route(
            "/warehouses/:id/stock/:product_id",
            get(handlers::inventory::get_stock_availability),
        )
}

/// Builds the application router with tracing, CORS and a request timeout.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}
