use rust_decimal::Decimal;

use crate::domain::{OrderId, ProductId};

use super::OrderStatus;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("OrderID {0} is not unique.")]
    OrderIdConsumed(OrderId),
    #[error("Order with ID {0} does not exist.")]
    OrderDoesNotExist(OrderId),
    #[error("User ID is required")]
    UserIdRequired,
    #[error("Cannot place an order without items.")]
    CannotPlaceEmptyOrder,
    #[error("Quantity of product {product_id} in size {size} must be at least 1.")]
    InvalidQuantity { product_id: ProductId, size: String },
    #[error("Price of product {0} cannot be negative.")]
    NegativePrice(ProductId),
    #[error("Shipping details are incomplete: {0} is required.")]
    IncompleteShippingDetails(&'static str),
    #[error("Order total is too large.")]
    AmountTooLarge,
    #[error("Total amount {received} does not match the expected total {expected}.")]
    TotalMismatch { expected: Decimal, received: Decimal },
    #[error("Order status cannot change from {from} to {to}.")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
}
