//! Place Order slice

use axum::Json;
use axum::extract::State;
use disintegrate::{Decision, StateMutate, StateQuery};
use jiff::Timestamp;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::domain::{DecisionMaker, DomainEvent, OrderId, OrderStream, UserId};
use crate::infra::{ClientError, Settings};

use super::{
    MAX_ORDER_TOTAL, Order, OrderError, OrderItem, OrderStatus, ShippingDetails, order_number,
    subtotal,
};

//------------------------- Web API ----------------------------

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderPayload {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub shipping_details: ShippingDetails,
}

pub async fn place_order_endpoint(
    State(decider): State<DecisionMaker>,
    State(settings): State<Settings>,
    Json(payload): Json<PlaceOrderPayload>,
) -> Result<Json<Order>, ClientError> {
    let user_uuid = payload.user_id.ok_or(OrderError::UserIdRequired)?;
    let user_id: UserId = user_uuid.try_into()?;

    let order_id = OrderId::new();
    let placed_at = Timestamp::now();
    let command = PlaceOrderCommand {
        order_id,
        user_id,
        order_number: order_number(order_id, placed_at),
        items: payload.items,
        total_amount: payload.total_amount,
        shipping_details: payload.shipping_details,
        shipping_fee: settings.orders.shipping_fee,
        placed_at,
    };

    decider.make(command.clone()).await?;
    info!(
        "Order {} ({order_id}) placed by user {user_id} for {}.",
        command.order_number, command.total_amount
    );

    Ok(Json(command.into()))
}

//------------------------- Command ----------------------------

#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub shipping_details: ShippingDetails,
    pub shipping_fee: Decimal,
    pub placed_at: Timestamp,
}

impl From<PlaceOrderCommand> for Order {
    fn from(command: PlaceOrderCommand) -> Self {
        Order {
            order_id: command.order_id,
            order_number: command.order_number,
            user_id: command.user_id,
            items: command.items,
            total_amount: command.total_amount,
            shipping_details: command.shipping_details,
            status: OrderStatus::Pending,
            created_at: command.placed_at,
        }
    }
}

impl PlaceOrderCommand {
    fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::CannotPlaceEmptyOrder);
        }

        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::InvalidQuantity {
                product_id: item.product_id,
                size: item.size.clone(),
            });
        }

        if let Some(item) = self.items.iter().find(|item| item.price.is_sign_negative()) {
            return Err(OrderError::NegativePrice(item.product_id));
        }

        if let Some(field) = self.shipping_details.missing_field() {
            return Err(OrderError::IncompleteShippingDetails(field));
        }

        let expected = subtotal(&self.items)
            .and_then(|subtotal| subtotal.checked_add(self.shipping_fee))
            .filter(|expected| *expected <= MAX_ORDER_TOTAL)
            .ok_or(OrderError::AmountTooLarge)?;
        if expected != self.total_amount {
            return Err(OrderError::TotalMismatch {
                expected,
                received: self.total_amount,
            });
        }

        Ok(())
    }
}

impl Decision for PlaceOrderCommand {
    type Event = DomainEvent;
    type StateQuery = PlaceOrderState;
    type Error = OrderError;

    fn state_query(&self) -> Self::StateQuery {
        PlaceOrderState {
            order_id: self.order_id,
            order_exists: false,
        }
    }

    fn process(&self, state: &Self::StateQuery) -> Result<Vec<Self::Event>, Self::Error> {
        if state.order_exists {
            return Err(OrderError::OrderIdConsumed(self.order_id));
        }

        self.validate()?;

        Ok(vec![DomainEvent::OrderPlaced {
            order_id: self.order_id,
            user_id: self.user_id,
            order_number: self.order_number.clone(),
            items: self.items.clone(),
            total_amount: self.total_amount,
            shipping_details: self.shipping_details.clone(),
            placed_at: self.placed_at,
        }])
    }
}

//---------------------- Command State --------------------------

#[derive(Clone, Debug, PartialEq, Eq, StateQuery, serde::Serialize, serde::Deserialize)]
#[state_query(OrderStream)]
pub struct PlaceOrderState {
    #[id]
    order_id: OrderId,
    order_exists: bool,
}

impl StateMutate for PlaceOrderState {
    fn mutate(&mut self, event: Self::Event) {
        match event {
            OrderStream::OrderPlaced { .. } => self.order_exists = true,
            OrderStream::OrderStatusChanged { .. } => {}
        }
    }
}

//-------------------------- Tests -------------------------------
