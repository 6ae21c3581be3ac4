//! Checkout: shipping details, a mock payment step, then a single order submission.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::{
    UserId,
    orders::{Order, OrderItem, ShippingDetails},
};

use super::{CartSnapshot, CartStore, OrderGateway, SubmissionError};

/// 4.99, the flat fee added to every order.
pub const STANDARD_SHIPPING_FEE: Decimal = Decimal::from_parts(499, 0, 0, false, 2);

const GENERIC_FAILURE: &str = "Failed to place order";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("Please fill in {0}.")]
    IncompleteShipping(&'static str),
    #[error("Shipping details have not been provided.")]
    ShippingNotProvided,
    #[error("This order has already been placed.")]
    AlreadyConfirmed,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl CheckoutError {
    /// What to show the shopper. Submission failures use the store's message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Submission(SubmissionError::Rejected {
                message: Some(message),
                ..
            }) => message.clone(),
            CheckoutError::Submission(_) => GENERIC_FAILURE.to_owned(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Confirmation(Box<Order>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// The body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub shipping_details: ShippingDetails,
}

pub struct Checkout<G: OrderGateway> {
    gateway: G,
    shipping_fee: Decimal,
    step: CheckoutStep,
    shipping_details: Option<ShippingDetails>,
}

impl<G: OrderGateway> Checkout<G> {
    pub fn new(gateway: G) -> Self {
        Checkout {
            gateway,
            shipping_fee: STANDARD_SHIPPING_FEE,
            step: CheckoutStep::Shipping,
            shipping_details: None,
        }
    }

    pub fn with_shipping_fee(mut self, shipping_fee: Decimal) -> Self {
        self.shipping_fee = shipping_fee;
        self
    }

    pub fn step(&self) -> &CheckoutStep {
        &self.step
    }

    pub fn shipping_details(&self) -> Option<&ShippingDetails> {
        self.shipping_details.as_ref()
    }

    /// Every field must be filled in. On failure the checkout stays on the shipping step.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<(), CheckoutError> {
        if matches!(self.step, CheckoutStep::Confirmation(_)) {
            return Err(CheckoutError::AlreadyConfirmed);
        }
        if let Some(field) = details.missing_field() {
            return Err(CheckoutError::IncompleteShipping(field));
        }

        self.shipping_details = Some(details);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Keeps the entered details for editing.
    pub fn back_to_shipping(&mut self) {
        if self.step == CheckoutStep::Payment {
            self.step = CheckoutStep::Shipping;
        }
    }

    pub fn summary<S: CartSnapshot>(&self, cart: &CartStore<S>) -> OrderSummary {
        let subtotal = cart.total_value();
        OrderSummary {
            subtotal,
            shipping_fee: self.shipping_fee,
            total: subtotal.saturating_add(self.shipping_fee),
        }
    }

    pub fn build_submission<S: CartSnapshot>(
        &self,
        user_id: UserId,
        cart: &CartStore<S>,
    ) -> Result<OrderSubmission, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping_details = self
            .shipping_details
            .clone()
            .ok_or(CheckoutError::ShippingNotProvided)?;

        Ok(OrderSubmission {
            user_id,
            items: cart.items().iter().map(OrderItem::from).collect(),
            total_amount: self.summary(cart).total,
            shipping_details,
        })
    }

    /// Submits the order once. The cart is cleared only when the store accepted the order;
    /// on any failure the cart and the current step are left as they were.
    pub async fn place_order<S: CartSnapshot>(
        &mut self,
        user_id: UserId,
        cart: &mut CartStore<S>,
    ) -> Result<Order, CheckoutError> {
        match self.step {
            CheckoutStep::Confirmation(_) => return Err(CheckoutError::AlreadyConfirmed),
            CheckoutStep::Shipping => return Err(CheckoutError::ShippingNotProvided),
            CheckoutStep::Payment => {}
        }
        let submission = self.build_submission(user_id, cart)?;

        let order = match self.gateway.create_order(&submission).await {
            Ok(order) => order,
            Err(err) => {
                warn!("Order submission for user {user_id} failed: {err}");
                return Err(err.into());
            }
        };

        info!(
            "Order {} placed for user {user_id}, total {}.",
            order.order_number, order.total_amount
        );
        cart.clear();
        self.step = CheckoutStep::Confirmation(Box::new(order.clone()));
        Ok(order)
    }
}
