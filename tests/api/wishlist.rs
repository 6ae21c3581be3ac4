use axum::http::StatusCode;
use serde_json::{Value, json};
use serial_test::serial;
use sneaker_store::domain::{ProductId, UserId};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::test_utils::{base_url, start_test_server};

#[sqlx::test]
#[serial]
async fn wishlist_is_kept_per_user(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let url = format!("{}/api/wishlist", base_url(&app_state));
    let client = reqwest::Client::new();
    let user_id = UserId::new().to_string();
    let product_id = ProductId::new();
    let item = json!({
        "productId": product_id,
        "name": "Air Jordan 4",
        "price": 189.99,
        "image": "https://images.example.com/aj4.jpg"
    });

    for _ in 0..2 {
        let added = client
            .post(&url)
            .header("user-id", &user_id)
            .json(&item)
            .send()
            .await
            .expect("Add request should be sent.");
        assert_eq!(added.status(), StatusCode::OK);
    }

    let wishlist: Value = client
        .get(&url)
        .header("user-id", &user_id)
        .send()
        .await
        .expect("Get request should be sent.")
        .json()
        .await
        .expect("Wishlist should be JSON.");

    let incomplete = client
        .post(&url)
        .header("user-id", &user_id)
        .json(&json!({ "productId": product_id }))
        .send()
        .await
        .expect("Add request should be sent.");
    let anonymous = client
        .get(&url)
        .send()
        .await
        .expect("Get request should be sent.");

    let removed = client
        .delete(&url)
        .header("user-id", &user_id)
        .json(&json!({ "productId": product_id }))
        .send()
        .await
        .expect("Delete request should be sent.");
    let emptied: Value = client
        .get(&url)
        .header("user-id", &user_id)
        .send()
        .await
        .expect("Get request should be sent.")
        .json()
        .await
        .expect("Wishlist should be JSON.");

    app_state.pool.close().await;

    let items = wishlist["items"].as_array().expect("Items should be a list.");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], json!(product_id));
    assert_eq!(items[0]["price"], json!(189.99));
    assert_eq!(incomplete.status(), StatusCode::BAD_REQUEST);
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(removed.status(), StatusCode::OK);
    assert_eq!(emptied["items"], json!([]));
}
