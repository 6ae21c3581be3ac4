use axum::http::StatusCode;
use serde_json::{Value, json};
use serial_test::serial;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::test_utils::{admin_client, base_url, client_for, sign_up, start_test_server};

#[sqlx::test]
#[serial]
async fn accounts_sign_up_once_and_sign_in_with_their_password(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let url = base_url(&app_state);
    let client = reqwest::Client::new();

    let user = sign_up(&app_state, "Sam Taylor", "Sam@Example.com", "secret1").await;

    let duplicate = client
        .post(format!("{url}/api/register"))
        .json(&json!({ "name": "Sam", "email": "sam@example.com", "password": "another1" }))
        .send()
        .await
        .expect("Register request should be sent.");
    let duplicate_status = duplicate.status();
    let duplicate_body: Value = duplicate.json().await.expect("Error should be JSON.");

    let short_password = client
        .post(format!("{url}/api/auth/signup"))
        .json(&json!({ "name": "Kim", "email": "kim@example.com", "password": "123" }))
        .send()
        .await
        .expect("Sign up request should be sent.");

    let signed_in: Value = client
        .post(format!("{url}/api/auth/signin"))
        .json(&json!({ "email": "sam@example.com", "password": "secret1" }))
        .send()
        .await
        .expect("Sign in request should be sent.")
        .json()
        .await
        .expect("Sign in response should be JSON.");
    let wrong_password = client
        .post(format!("{url}/api/auth/signin"))
        .json(&json!({ "email": "sam@example.com", "password": "secret2" }))
        .send()
        .await
        .expect("Sign in request should be sent.");
    let wrong_password_status = wrong_password.status();
    let wrong_password_body: Value = wrong_password.json().await.expect("Error should be JSON.");

    app_state.pool.close().await;

    assert_eq!(user["email"], "sam@example.com");
    assert_eq!(user["role"], "customer");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
    assert_eq!(duplicate_status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate_body["error"], "User already exists");
    assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(signed_in["success"], true);
    assert_eq!(signed_in["user"]["id"], user["id"]);
    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body["error"], "Invalid credentials");
}

#[sqlx::test]
#[serial]
async fn dashboard_is_for_admins_and_counts_customers(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let url = format!("{}/api/dashboard/stats", base_url(&app_state));
    let admin = admin_client(&app_state).await;
    let shopper = sign_up(&app_state, "Sam Taylor", "sam@example.com", "secret1").await;
    sign_up(&app_state, "Kim Lee", "kim@example.com", "secret1").await;

    let anonymous = reqwest::get(&url)
        .await
        .expect("Stats request should be sent.");
    let customer = client_for(&shopper)
        .get(&url)
        .send()
        .await
        .expect("Stats request should be sent.");
    let stats: Value = admin
        .get(&url)
        .send()
        .await
        .expect("Stats request should be sent.")
        .json()
        .await
        .expect("Stats should be JSON.");

    app_state.pool.close().await;

    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(customer.status(), StatusCode::FORBIDDEN);
    assert_eq!(stats["totalCustomers"], 2);
    assert_eq!(stats["totalOrders"], 0);
}
