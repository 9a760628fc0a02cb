#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use uuid::Uuid;

use fuelflow_api::auth::Role;
use fuelflow_api::config::AppConfig;
use fuelflow_api::db::{establish_connection_with_config, run_migrations, DbConfig, DbPool};
use fuelflow_api::entities::{inventory_line, product, user, vehicle, warehouse};
use fuelflow_api::events::{self, EventSender};
use fuelflow_api::handlers::AppServices;
use fuelflow_api::services::orders::CreateOrderRequest;

pub struct TestApp {
    pub db: Arc<DbPool>,
    pub services: AppServices,
}

/// Fresh in-memory database with migrations applied and services wired.
/// A single pooled connection keeps every query on the same SQLite memory
/// instance.
pub async fn spawn_app() -> TestApp {
    let db_config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout: Duration::from_secs(5),
    };
    let db = establish_connection_with_config(&db_config)
        .await
        .expect("failed to open in-memory database");
    run_migrations(&db).await.expect("failed to run migrations");
    let db = Arc::new(db);

    let (tx, rx) = mpsc::channel(256);
    tokio::spawn(events::process_events(rx));
    let event_sender = EventSender::new(tx);

    let config = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        0,
        "test".to_string(),
    );
    let services = AppServices::build(db.clone(), &config, event_sender);

    TestApp { db, services }
}

pub async fn seed_product(app: &TestApp, name: &str, unit_price: Decimal, unit: &str) -> Uuid {
    let id = Uuid::new_v4();
    product::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        fuel_type: Set("diesel".to_string()),
        unit_price: Set(unit_price),
        unit: Set(unit.to_string()),
        description: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(&*app.db)
    .await
    .expect("failed to seed product");
    id
}

pub async fn seed_warehouse(app: &TestApp, name: &str, total_capacity: Decimal) -> Uuid {
    seed_warehouse_with_id(app, Uuid::new_v4(), name, total_capacity).await
}

pub async fn seed_warehouse_with_id(
    app: &TestApp,
    id: Uuid,
    name: &str,
    total_capacity: Decimal,
) -> Uuid {
    warehouse::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        location: Set("Industrial district".to_string()),
        total_capacity: Set(total_capacity),
        unit: Set("liter".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(&*app.db)
    .await
    .expect("failed to seed warehouse");
    id
}

pub async fn seed_stock(app: &TestApp, warehouse_id: Uuid, product_id: Uuid, quantity: Decimal) {
    inventory_line::ActiveModel {
        id: Set(Uuid::new_v4()),
        warehouse_id: Set(warehouse_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        received_at: Set(Utc::now()),
    }
    .insert(&*app.db)
    .await
    .expect("failed to seed inventory line");
}

pub async fn seed_user(app: &TestApp, name: &str, role: Role, vehicle_id: Option<Uuid>) -> Uuid {
    let id = Uuid::new_v4();
    user::ActiveModel {
        id: Set(id),
        email: Set(format!("{}@example.com", id.simple())),
        name: Set(name.to_string()),
        national_id: Set(id.simple().to_string()),
        phone: Set(None),
        address: Set(None),
        role: Set(role.as_str().to_string()),
        vehicle_id: Set(vehicle_id),
        created_at: Set(Utc::now()),
    }
    .insert(&*app.db)
    .await
    .expect("failed to seed user");
    id
}

pub async fn seed_customer(app: &TestApp) -> Uuid {
    seed_user(app, "Test Customer", Role::Customer, None).await
}

pub async fn seed_vehicle(app: &TestApp, capacity_liters: Decimal) -> Uuid {
    let id = Uuid::new_v4();
    vehicle::ActiveModel {
        id: Set(id),
        plate: Set(format!("TRK-{}", &id.simple().to_string()[..6])),
        make: Set("Volvo".to_string()),
        model: Set("FH".to_string()),
        year: Set(Some(2020)),
        capacity_liters: Set(capacity_liters),
        created_at: Set(Utc::now()),
    }
    .insert(&*app.db)
    .await
    .expect("failed to seed vehicle");
    id
}

pub async fn seed_driver(app: &TestApp, capacity_liters: Decimal) -> Uuid {
    let vehicle_id = seed_vehicle(app, capacity_liters).await;
    seed_user(app, "Test Driver", Role::Driver, Some(vehicle_id)).await
}

pub fn order_request(customer_id: Uuid, product_id: Uuid, volume: Decimal) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id,
        product_id,
        requested_volume: volume,
        delivery_location: "Main St 1".to_string(),
        warehouse_id: None,
        driver_id: None,
        unit_price: None,
        window_start: None,
        window_end: None,
        payment_method: None,
        notes: None,
    }
}
