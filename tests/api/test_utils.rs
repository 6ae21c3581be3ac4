use std::{future::Future, time::Duration};

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sneaker_store::{AppState, construct_app_state, infra::get_config_settings, start_server};
use sqlx::postgres::PgConnectOptions;
use tokio::task::JoinHandle;

/// Asserts that a function returns an expected value or retries until it does.
/// Retries every 500ms if the values do not match.
/// Will fail immediately on an error or after 60 retries (30 seconds).
pub async fn assert_until_eq<F, Fut, T, E>(f: F, expected_value: T, label: &str)
where
    F: Fn() -> Fut,
    E: std::fmt::Debug,
    Fut: Future<Output = Result<T, E>>,
    T: PartialEq + std::fmt::Debug,
{
    let delay_ms = 500;
    let max_times = 60;
    let mut times: usize = 0;
    let mut result: T = f().await.unwrap();
    while times < max_times {
        times += 1;
        if result == expected_value {
            break;
        } else {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            println!("Retry #{times} {label}");
            result = f().await.unwrap();
        }
    }
    assert_eq!(result, expected_value);
}

/// Starts the whole server against the test database and waits until it answers health checks.
pub async fn start_test_server(
    connect_options: PgConnectOptions,
) -> (JoinHandle<Result<(), anyhow::Error>>, AppState) {
    let mut settings = get_config_settings().expect("Could not read application configuration.");
    settings.database.database_name = connect_options
        .get_database()
        .expect("Expected database name.")
        .into();
    // bcrypt's minimum cost keeps sign ups fast.
    settings.users.password_hash_cost = 4;
    let app_state = construct_app_state(settings)
        .await
        .expect("Expected AppState to be created.");
    let server_handle = tokio::task::spawn(start_server(app_state.clone()));

    let client = httpc_test::new_client(base_url(&app_state)).expect("Expected client to be created.");
    for _ in 0..50 {
        if client.do_get("/healthcheck").await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    (server_handle, app_state)
}

pub fn base_url(app_state: &AppState) -> String {
    app_state.settings.application.base_url()
}

/// Registers an account through the API and returns the created user.
pub async fn sign_up(app_state: &AppState, name: &str, email: &str, password: &str) -> Value {
    let res = reqwest::Client::new()
        .post(format!("{}/api/auth/signup", base_url(app_state)))
        .json(&json!({ "name": name, "email": email, "password": password }))
        .send()
        .await
        .expect("Sign up request should be sent.");
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let body: Value = res.json().await.expect("Sign up response should be JSON.");
    body["user"].clone()
}

/// A client that sends the given user's id with every request.
pub fn client_for(user: &Value) -> reqwest::Client {
    let user_id = user["id"].as_str().expect("User should have an id.");
    let mut headers = HeaderMap::new();
    headers.insert(
        "user-id",
        HeaderValue::from_str(user_id).expect("User id should be a valid header."),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("Expected client to be created.")
}

/// Registers the configured admin account and returns a client acting as it.
pub async fn admin_client(app_state: &AppState) -> reqwest::Client {
    let email = app_state
        .settings
        .users
        .admin_emails
        .first()
        .expect("An admin email should be configured.")
        .clone();
    let admin = sign_up(app_state, "Store Admin", &email, "admin-secret").await;
    assert_eq!(admin["role"], "admin");
    client_for(&admin)
}

pub async fn create_product(client: &reqwest::Client, app_state: &AppState, product: Value) -> Value {
    let res = client
        .post(format!("{}/api/products", base_url(app_state)))
        .json(&product)
        .send()
        .await
        .expect("Create request should be sent.");
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    res.json().await.expect("Product should be JSON.")
}

pub fn new_product(name: &str, category: &str, price: Decimal) -> Value {
    json!({
        "name": name,
        "brand": "Nike",
        "description": "Test pair.",
        "price": price,
        "images": [format!("https://images.example.com/{}.jpg", name.replace(' ', "-"))],
        "sizes": ["UK8", "UK9", "UK10"],
        "colors": ["Black", "White"],
        "style": "Low",
        "category": category,
    })
}
