use fake::{Fake, Faker};
use rust_decimal::Decimal;
use serial_test::serial;
use sneaker_store::{
    domain::{
        UserId,
        catalog::Product,
        orders::{OrderStatus, ShippingDetails, user_orders_read_model},
    },
    storefront::{
        CartStore, Checkout, CheckoutError, CheckoutStep, HttpOrderGateway, MemoryCartSnapshot,
        ProductSummary, Size, SubmissionError,
    },
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::test_utils::{admin_client, base_url, create_product, new_product, start_test_server};

fn size(label: &str) -> Size {
    label.parse().expect("Size should be valid.")
}

#[sqlx::test]
#[serial]
async fn cart_is_checked_out_against_the_store(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let url = base_url(&app_state);
    let admin = admin_client(&app_state).await;

    let product: Product = serde_json::from_value(
        create_product(
            &admin,
            &app_state,
            new_product("Gel-Lyte III", "Running", Decimal::new(11000, 2)),
        )
        .await,
    )
    .expect("Product should deserialize.");
    let summary = ProductSummary::try_from(&product).expect("Product should be summarised.");

    let mut cart = CartStore::open(MemoryCartSnapshot::new());
    cart.add_item(&summary, size("UK9"));
    cart.add_item(&summary, size("UK9"));
    cart.add_item(&summary, size("UK10"));

    let mut checkout = Checkout::new(HttpOrderGateway::new(url))
        .with_shipping_fee(app_state.settings.orders.shipping_fee);
    let shipping: ShippingDetails = Faker.fake();
    checkout
        .submit_shipping(shipping.clone())
        .expect("Shipping should be accepted.");
    let expected_total = checkout.summary(&cart).total;
    let user_id = UserId::new();

    let order = checkout
        .place_order(user_id, &mut cart)
        .await
        .expect("Order should be placed.");

    let history = user_orders_read_model(&app_state.event_store, &user_id)
        .await
        .expect("Order history should be read.");

    app_state.pool.close().await;

    assert!(cart.is_empty());
    assert!(matches!(checkout.step(), CheckoutStep::Confirmation(_)));
    assert_eq!(order.total_amount, expected_total);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.shipping_details, shipping);
    assert_eq!(order.items.len(), 2);
    assert_eq!(history, vec![order]);
}

#[sqlx::test]
#[serial]
async fn rejected_order_leaves_cart_alone(
    _pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let (_, app_state) = start_test_server(connect_options).await;
    let url = base_url(&app_state);

    let product: Product = Faker.fake();
    let summary = ProductSummary::try_from(&product).expect("Product should be summarised.");
    let mut cart = CartStore::open(MemoryCartSnapshot::new());
    cart.add_item(&summary, size("UK8"));
    let items_before = cart.items().to_vec();

    // The store adds its own shipping fee, so a free-shipping total is rejected.
    let mut checkout = Checkout::new(HttpOrderGateway::new(url)).with_shipping_fee(Decimal::ZERO);
    checkout
        .submit_shipping(Faker.fake())
        .expect("Shipping should be accepted.");

    let result = checkout.place_order(UserId::new(), &mut cart).await;

    app_state.pool.close().await;

    let err = result.expect_err("Order should be rejected.");
    assert!(matches!(
        err,
        CheckoutError::Submission(SubmissionError::Rejected { status: 400, .. })
    ));
    assert!(err.user_message().starts_with("Total amount"));
    assert_eq!(cart.items(), items_before.as_slice());
    assert_eq!(checkout.step(), &CheckoutStep::Payment);
}
