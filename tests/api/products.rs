use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use serial_test::serial;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::test_utils::{
    admin_client, base_url, client_for, create_product, new_product, sign_up, start_test_server,
};

#[sqlx::test]
#[serial]
async fn products_can_be_managed_and_filtered(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let url = base_url(&app_state);
    let admin = admin_client(&app_state).await;
    let client = httpc_test::new_client(url.clone()).expect("Expected client to be created.");

    let runner = create_product(
        &admin,
        &app_state,
        new_product("Pegasus 41", "Running", Decimal::new(120, 0)),
    )
    .await;
    create_product(
        &admin,
        &app_state,
        new_product("Dunk Low", "Lifestyle", Decimal::new(250, 0)),
    )
    .await;
    let runner_path = format!(
        "/api/products/{}",
        runner["id"].as_str().expect("Product should have an id.")
    );

    let running = client
        .do_get("/api/products?category=RUNNING&size=all&color=all&price=all")
        .await
        .expect("List request should be sent.")
        .json_body()
        .expect("Products should be JSON.");
    let expensive = client
        .do_get("/api/products?price=200-")
        .await
        .expect("List request should be sent.")
        .json_body()
        .expect("Products should be JSON.");
    let bad_price = client
        .do_get("/api/products?price=cheap")
        .await
        .expect("List request should be sent.");

    let updated: Value = admin
        .put(format!("{url}{runner_path}"))
        .json(&new_product("Pegasus 41 GTX", "Running", Decimal::new(140, 0)))
        .send()
        .await
        .expect("Update request should be sent.")
        .json()
        .await
        .expect("Product should be JSON.");

    let deleted = admin
        .delete(format!("{url}{runner_path}"))
        .send()
        .await
        .expect("Delete request should be sent.");
    let gone = client
        .do_get(&runner_path)
        .await
        .expect("Get request should be sent.");

    app_state.pool.close().await;

    assert_eq!(running.as_array().map(Vec::len), Some(1));
    assert_eq!(running[0]["name"], "Pegasus 41");
    assert_eq!(expensive.as_array().map(Vec::len), Some(1));
    assert_eq!(expensive[0]["name"], "Dunk Low");
    assert_eq!(bad_price.status(), StatusCode::BAD_REQUEST);
    assert_eq!(updated["name"], "Pegasus 41 GTX");
    assert_eq!(updated["price"], json!(140.0));
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        gone.json_body().expect("Error should be JSON.")["error"],
        "Product not found"
    );
}

#[sqlx::test]
#[serial]
async fn only_admins_change_the_catalog(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let url = format!("{}/api/products", base_url(&app_state));
    let shopper = sign_up(&app_state, "Sam Taylor", "sam@example.com", "secret1").await;
    let product = new_product("Samba OG", "Lifestyle", Decimal::new(100, 0));

    let anonymous = reqwest::Client::new()
        .post(&url)
        .json(&product)
        .send()
        .await
        .expect("Create request should be sent.");
    let customer = client_for(&shopper)
        .post(&url)
        .json(&product)
        .send()
        .await
        .expect("Create request should be sent.");
    let overpriced = admin_client(&app_state)
        .await
        .post(&url)
        .json(&new_product("Air Mag", "Lifestyle", Decimal::new(2_000_000, 0)))
        .send()
        .await
        .expect("Create request should be sent.");
    let listed: Value = reqwest::get(&url)
        .await
        .expect("List request should be sent.")
        .json()
        .await
        .expect("Products should be JSON.");

    app_state.pool.close().await;

    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(customer.status(), StatusCode::FORBIDDEN);
    assert_eq!(overpriced.status(), StatusCode::BAD_REQUEST);
    assert_eq!(listed, json!([]));
}
