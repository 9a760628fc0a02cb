mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fuelflow_api::errors::ServiceError;

use common::{order_request, seed_customer, seed_product, seed_stock, seed_warehouse, spawn_app};

#[tokio::test]
async fn concurrent_orders_for_the_last_stock_cannot_both_succeed() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let warehouse = seed_warehouse(&app, "North depot", dec!(1000)).await;
    seed_stock(&app, warehouse, product, dec!(100)).await;
    let customer = seed_customer(&app).await;

    let mut first = order_request(customer, product, dec!(100));
    first.warehouse_id = Some(warehouse);
    let second = first.clone();

    let (a, b) = tokio::join!(
        app.services.orders.create_order(first),
        app.services.orders.create_order(second),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of the racing orders may win");

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(
        loser.unwrap_err(),
        ServiceError::InsufficientStock { .. }
    ));

    assert_eq!(
        app.services
            .inventory
            .available_for(warehouse, product)
            .await
            .unwrap(),
        dec!(0)
    );
}

#[tokio::test]
async fn repeated_reservations_stop_exactly_at_zero() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let warehouse = seed_warehouse(&app, "North depot", dec!(1000)).await;
    seed_stock(&app, warehouse, product, dec!(50)).await;

    let mut successes = 0;
    let mut failures = 0;
    for _ in 0..10 {
        match app
            .services
            .inventory
            .reserve(warehouse, product, dec!(10))
            .await
        {
            Ok(()) => successes += 1,
            Err(ServiceError::InsufficientStock { available, .. }) => {
                assert_eq!(available, Decimal::ZERO);
                failures += 1;
            }
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 5);
    assert_eq!(failures, 5);
    assert_eq!(
        app.services
            .inventory
            .available_for(warehouse, product)
            .await
            .unwrap(),
        dec!(0)
    );
}

#[tokio::test]
async fn restock_honors_warehouse_capacity() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let warehouse = seed_warehouse(&app, "North depot", dec!(500)).await;
    seed_stock(&app, warehouse, product, dec!(450)).await;

    let err = app
        .services
        .inventory
        .restock(warehouse, product, dec!(100))
        .await
        .unwrap_err();
    match err {
        ServiceError::CapacityExceeded { requested, deficit } => {
            assert_eq!(requested, dec!(100));
            assert_eq!(deficit, dec!(50));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    app.services
        .inventory
        .restock(warehouse, product, dec!(50))
        .await
        .unwrap();
    assert_eq!(
        app.services
            .inventory
            .available_for(warehouse, product)
            .await
            .unwrap(),
        dec!(500)
    );
}

#[tokio::test]
async fn restock_counts_all_products_against_capacity() {
    let app = spawn_app().await;
    let diesel = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let gasoline = seed_product(&app, "Gasoline", dec!(12), "liter").await;
    let warehouse = seed_warehouse(&app, "North depot", dec!(500)).await;
    seed_stock(&app, warehouse, diesel, dec!(300)).await;
    seed_stock(&app, warehouse, gasoline, dec!(150)).await;

    let err = app
        .services
        .inventory
        .restock(warehouse, diesel, dec!(100))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::CapacityExceeded { .. }));

    app.services
        .inventory
        .restock(warehouse, diesel, dec!(50))
        .await
        .unwrap();
}

#[tokio::test]
async fn restock_creates_the_line_on_first_delivery() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let warehouse = seed_warehouse(&app, "North depot", dec!(500)).await;

    app.services
        .inventory
        .restock(warehouse, product, dec!(120))
        .await
        .unwrap();

    let stock = app
        .services
        .inventory
        .list_for_warehouse(warehouse)
        .await
        .unwrap();
    assert_eq!(stock.len(), 1);
    assert_eq!(stock[0].quantity, dec!(120));
    assert_eq!(stock[0].product_name, "Diesel");
}

#[tokio::test]
async fn release_recreates_a_missing_line() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let warehouse = seed_warehouse(&app, "North depot", dec!(500)).await;

    app.services
        .inventory
        .release(warehouse, product, dec!(30))
        .await
        .unwrap();

    assert_eq!(
        app.services
            .inventory
            .available_for(warehouse, product)
            .await
            .unwrap(),
        dec!(30)
    );
}

#[tokio::test]
async fn restock_rejects_unknown_warehouses_and_bad_volumes() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let warehouse = seed_warehouse(&app, "North depot", dec!(500)).await;

    let err = app
        .services
        .inventory
        .restock(uuid::Uuid::new_v4(), product, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = app
        .services
        .inventory
        .restock(warehouse, product, dec!(0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = app
        .services
        .inventory
        .reserve(warehouse, product, dec!(-5))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
