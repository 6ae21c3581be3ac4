//! Order records shared by the order decisions, the read models and the storefront client.

use jiff::Timestamp;
use rust_decimal::Decimal;
use strum_macros::Display;

use crate::domain::{OrderId, ProductId, UserId};

/// Largest order total the orders table can hold.
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(
    (999_999_999_999_u64 & 0xFFFF_FFFF) as u32,
    (999_999_999_999_u64 >> 32) as u32,
    0,
    false,
    2,
);

/// One ordered product variant. Name, price and image are captured when the item was put in the
/// cart, not looked up again at order time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub size: String,
    pub image: String,
}

impl OrderItem {
    /// `None` if `price * quantity` does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

impl ShippingDetails {
    /// The wire name of the first blank field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("postcode", &self.postcode),
            ("country", &self.country),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

// We use a INT postgres representation, ordered by fulfilment progress.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Display,
    serde::Serialize,
    serde::Deserialize,
    sqlx::Type,
)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending = 0,
    Processing = 1,
    Shipped = 2,
    Delivered = 3,
}

/// The created-order record returned to the storefront and listed in order history.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "id")]
    pub order_id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub shipping_details: ShippingDetails,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

/// Sum of `price * quantity` over the items, before shipping. `None` on overflow.
pub fn subtotal(items: &[OrderItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(item.line_total()?)
    })
}

/// Order numbers look like `UK1718000000000123`: placement time in epoch milliseconds followed by
/// a 0..=999 suffix taken from the random bits of the order id.
pub fn order_number(order_id: OrderId, placed_at: Timestamp) -> String {
    let suffix = uuid::Uuid::from(order_id).as_u128() % 1000;
    format!("UK{}{}", placed_at.as_millisecond(), suffix)
}
