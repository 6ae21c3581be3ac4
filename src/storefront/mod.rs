//! The shopping side of the store: a durable cart, its pricing and the checkout flow that turns it
//! into an order on the store server.

mod cart;
mod checkout;
mod gateway;
mod pricing;
mod snapshot;

pub use cart::{CartChange, CartError, CartStore, LineItem, ProductSummary, Size, SubscriptionId};
pub use checkout::{
    Checkout, CheckoutError, CheckoutStep, OrderSubmission, OrderSummary, STANDARD_SHIPPING_FEE,
};
pub use gateway::{HttpOrderGateway, OrderGateway, SubmissionError};
pub use pricing::{CartTotals, total_item_count, total_value, totals};
pub use snapshot::{CartSnapshot, FileCartSnapshot, MemoryCartSnapshot, SnapshotError};
