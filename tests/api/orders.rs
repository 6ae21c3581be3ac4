use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use serial_test::serial;
use sneaker_store::domain::{
    OrderId, ProductId, UserId,
    dashboard::dashboard_stats,
    orders::{OrderStatus, orders_from_db_read_model_reset, recent_orders},
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::test_utils::{assert_until_eq, base_url, sign_up, start_test_server};

fn order_body(user_id: Option<UserId>, total_amount: f64) -> Value {
    json!({
        "userId": user_id,
        "items": [
            {
                "productId": ProductId::new(),
                "name": "Air Max 1",
                "price": 120.0,
                "quantity": 2,
                "size": "UK9",
                "image": "https://images.example.com/am1.jpg"
            }
        ],
        "totalAmount": total_amount,
        "shippingDetails": {
            "fullName": "Sam Taylor",
            "email": "sam@example.com",
            "address": "1 High Street",
            "city": "Leeds",
            "postcode": "LS1 1AA",
            "country": "United Kingdom"
        }
    })
}

#[sqlx::test]
#[serial]
async fn placed_order_shows_up_in_history_and_recent_orders(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let client = httpc_test::new_client(base_url(&app_state)).expect("Expected client to be created.");
    let user = sign_up(&app_state, "Sam Taylor", "sam@example.com", "secret1").await;
    let user_id: UserId = user["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("User id should be a v7 UUID.");

    let res = client
        .do_post("/api/orders", order_body(Some(user_id), 244.99))
        .await
        .expect("Order request should be sent.");
    assert_eq!(res.status(), StatusCode::OK);
    let order = res.json_body().expect("Order should be JSON.");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["totalAmount"], json!(244.99));
    assert!(
        order["orderNumber"]
            .as_str()
            .is_some_and(|number| number.starts_with("UK"))
    );
    let order_id: OrderId = order["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("Order id should be a v7 UUID.");

    let history = client
        .do_get(&format!("/api/orders?userId={user_id}"))
        .await
        .expect("History request should be sent.")
        .json_body()
        .expect("History should be JSON.");
    assert_eq!(history[0]["id"], order["id"]);

    assert_until_eq(
        || async {
            recent_orders(&app_state.pool, 3)
                .await
                .map(|orders| orders.iter().any(|order| order.order_id == order_id))
        },
        true,
        "Waiting for the orders projection.",
    )
    .await;

    let stats = dashboard_stats(&app_state.pool)
        .await
        .expect("Stats should be read.");

    app_state.pool.close().await;

    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_customers, 1);
    assert_eq!(stats.total_sales, Decimal::new(24499, 2));
}

#[sqlx::test]
#[serial]
async fn invalid_orders_are_rejected(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let client = httpc_test::new_client(base_url(&app_state)).expect("Expected client to be created.");

    let no_user = client
        .do_post("/api/orders", order_body(None, 244.99))
        .await
        .expect("Order request should be sent.");
    let wrong_total = client
        .do_post("/api/orders", order_body(Some(UserId::new()), 240.0))
        .await
        .expect("Order request should be sent.");
    let mut huge_order = order_body(Some(UserId::new()), 244.99);
    huge_order["items"][0]["price"] = json!(7e28);
    let too_large = client
        .do_post("/api/orders", huge_order)
        .await
        .expect("Order request should be sent.");
    let no_user_history = client
        .do_get("/api/orders")
        .await
        .expect("History request should be sent.");

    app_state.pool.close().await;

    assert_eq!(no_user.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        no_user.json_body().expect("Error should be JSON.")["error"],
        "User ID is required"
    );
    assert_eq!(wrong_total.status(), StatusCode::BAD_REQUEST);
    assert!(wrong_total.json_body().expect("Error should be JSON.")["error"].is_string());
    assert_eq!(too_large.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        too_large.json_body().expect("Error should be JSON.")["error"],
        "Order total is too large."
    );
    assert_eq!(no_user_history.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[serial]
async fn order_status_only_moves_forward(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let client = httpc_test::new_client(base_url(&app_state)).expect("Expected client to be created.");

    let order = client
        .do_post("/api/orders", order_body(Some(UserId::new()), 244.99))
        .await
        .expect("Order request should be sent.")
        .json_body()
        .expect("Order should be JSON.");
    let order_id = order["id"].as_str().expect("Order should have an id.");
    let status_path = format!("/api/orders/{order_id}/status");

    let shipped = client
        .do_post(&status_path, json!({ "status": OrderStatus::Shipped }))
        .await
        .expect("Status request should be sent.");
    let back_to_processing = client
        .do_post(&status_path, json!({ "status": "processing" }))
        .await
        .expect("Status request should be sent.");
    let unknown = client
        .do_post(
            &format!("/api/orders/{}/status", OrderId::new()),
            json!({ "status": "shipped" }),
        )
        .await
        .expect("Status request should be sent.");

    app_state.pool.close().await;

    assert_eq!(shipped.status(), StatusCode::OK);
    assert_eq!(back_to_processing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[serial]
async fn reset_orders_read_model_replays_events(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let client = httpc_test::new_client(base_url(&app_state)).expect("Expected client to be created.");

    let order = client
        .do_post("/api/orders", order_body(Some(UserId::new()), 244.99))
        .await
        .expect("Order request should be sent.")
        .json_body()
        .expect("Order should be JSON.");
    let order_id: OrderId = order["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("Order id should be a v7 UUID.");
    let projected_ids = || async {
        recent_orders(&app_state.pool, 3)
            .await
            .map(|orders| orders.iter().map(|order| order.order_id).collect::<Vec<_>>())
    };

    assert_until_eq(projected_ids, vec![order_id], "Waiting for the orders projection.").await;

    orders_from_db_read_model_reset(&app_state.pool)
        .await
        .expect("Read model should be reset.");

    assert_until_eq(projected_ids, vec![order_id], "Waiting for the orders replay.").await;

    app_state.pool.close().await;
}
