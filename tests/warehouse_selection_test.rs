mod common;

use rust_decimal_macros::dec;
use uuid::Uuid;

use fuelflow_api::errors::ServiceError;

use common::{
    order_request, seed_customer, seed_product, seed_stock, seed_warehouse,
    seed_warehouse_with_id, spawn_app,
};

#[tokio::test]
async fn selector_picks_the_warehouse_with_most_available_stock() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let small = seed_warehouse(&app, "Small depot", dec!(1000)).await;
    let large = seed_warehouse(&app, "Large depot", dec!(1000)).await;
    seed_stock(&app, small, product, dec!(20)).await;
    seed_stock(&app, large, product, dec!(50)).await;
    let customer = seed_customer(&app).await;

    let order = app
        .services
        .orders
        .create_order(order_request(customer, product, dec!(30)))
        .await
        .unwrap();

    assert_eq!(order.warehouse_id, large);
    assert_eq!(
        app.services
            .inventory
            .available_for(large, product)
            .await
            .unwrap(),
        dec!(20)
    );
    assert_eq!(
        app.services
            .inventory
            .available_for(small, product)
            .await
            .unwrap(),
        dec!(20)
    );
}

#[tokio::test]
async fn no_single_warehouse_can_cover_the_request() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let small = seed_warehouse(&app, "Small depot", dec!(1000)).await;
    let large = seed_warehouse(&app, "Large depot", dec!(1000)).await;
    seed_stock(&app, small, product, dec!(20)).await;
    seed_stock(&app, large, product, dec!(50)).await;
    let customer = seed_customer(&app).await;

    // 70 in total across warehouses, but no single one holds 60.
    let err = app
        .services
        .orders
        .create_order(order_request(customer, product, dec!(60)))
        .await
        .unwrap_err();

    match err {
        ServiceError::NoWarehouseAvailable {
            product_id,
            requested,
        } => {
            assert_eq!(product_id, product);
            assert_eq!(requested, dec!(60));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn open_orders_reduce_what_the_selector_considers_available() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let warehouse = seed_warehouse(&app, "Only depot", dec!(1000)).await;
    seed_stock(&app, warehouse, product, dec!(50)).await;
    let customer = seed_customer(&app).await;

    app.services
        .orders
        .create_order(order_request(customer, product, dec!(15)))
        .await
        .unwrap();

    // Line is down to 35 and 15 is still committed to the open order, so
    // only 20 remains selectable.
    let available = app
        .services
        .selector
        .available_volume(warehouse, product)
        .await
        .unwrap();
    assert_eq!(available, dec!(20));

    let err = app
        .services
        .orders
        .create_order(order_request(customer, product, dec!(30)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NoWarehouseAvailable { .. }));

    let order = app
        .services
        .orders
        .create_order(order_request(customer, product, dec!(20)))
        .await
        .unwrap();
    assert_eq!(order.warehouse_id, warehouse);
}

#[tokio::test]
async fn ties_break_toward_the_lowest_warehouse_id() {
    let app = spawn_app().await;
    let product = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let first = seed_warehouse_with_id(&app, Uuid::from_u128(1), "Depot A", dec!(1000)).await;
    let second = seed_warehouse_with_id(&app, Uuid::from_u128(2), "Depot B", dec!(1000)).await;
    seed_stock(&app, first, product, dec!(40)).await;
    seed_stock(&app, second, product, dec!(40)).await;
    let customer = seed_customer(&app).await;

    let order = app
        .services
        .orders
        .create_order(order_request(customer, product, dec!(10)))
        .await
        .unwrap();

    assert_eq!(order.warehouse_id, first);
    assert_eq!(
        app.services
            .inventory
            .available_for(second, product)
            .await
            .unwrap(),
        dec!(40)
    );
}

#[tokio::test]
async fn selector_ignores_warehouses_without_a_line_for_the_product() {
    let app = spawn_app().await;
    let diesel = seed_product(&app, "Diesel", dec!(10), "liter").await;
    let gasoline = seed_product(&app, "Gasoline", dec!(12), "liter").await;
    let diesel_depot = seed_warehouse(&app, "Diesel depot", dec!(1000)).await;
    let gasoline_depot = seed_warehouse(&app, "Gasoline depot", dec!(1000)).await;
    seed_stock(&app, diesel_depot, diesel, dec!(100)).await;
    seed_stock(&app, gasoline_depot, gasoline, dec!(100)).await;
    let customer = seed_customer(&app).await;

    let order = app
        .services
        .orders
        .create_order(order_request(customer, diesel, dec!(10)))
        .await
        .unwrap();
    assert_eq!(order.warehouse_id, diesel_depot);
}
