//! Update Order Status slice, used by the admin dashboard to move an order through fulfilment.

use anyhow::Context;
use axum::{
    Json,
    extract::{Path, State},
};
use disintegrate::{Decision, StateMutate, StateQuery};
use uuid::Uuid;

use crate::{
    domain::{DecisionMaker, DomainEvent, OrderId, OrderStream, UserId},
    infra::ClientError,
};

use super::{OrderError, OrderStatus};

//------------------------- Web API ----------------------------

#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
}

pub async fn update_order_status_endpoint(
    State(decider): State<DecisionMaker>,
    Path(order_uuid): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<Json<(Uuid, i64)>, ClientError> {
    let order_id: OrderId = order_uuid.try_into()?;
    let decision = UpdateOrderStatusCommand {
        order_id,
        status: payload.status,
    };
    let events = decider.make(decision).await?;

    let last_event_id = events
        .into_iter()
        .last()
        .map(|e| e.id())
        .context("No event returned for UpdateOrderStatusCommand!")?;

    Ok(Json((order_uuid, last_event_id)))
}

//------------------------- Command ----------------------------

#[derive(Debug, Clone)]
pub struct UpdateOrderStatusCommand {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

impl Decision for UpdateOrderStatusCommand {
    type Event = DomainEvent;
    type StateQuery = UpdateOrderStatusState;
    type Error = OrderError;

    fn state_query(&self) -> Self::StateQuery {
        UpdateOrderStatusState {
            order_id: self.order_id,
            user_id: None,
            status: OrderStatus::default(),
        }
    }

    fn process(&self, state: &Self::StateQuery) -> Result<Vec<Self::Event>, Self::Error> {
        let Some(user_id) = state.user_id else {
            return Err(OrderError::OrderDoesNotExist(self.order_id));
        };

        // Fulfilment only moves forward.
        if self.status <= state.status {
            return Err(OrderError::InvalidStatusTransition {
                from: state.status,
                to: self.status,
            });
        }

        Ok(vec![DomainEvent::OrderStatusChanged {
            order_id: self.order_id,
            user_id,
            status: self.status,
        }])
    }
}

//---------------------- Command State --------------------------

#[derive(Clone, Debug, PartialEq, Eq, StateQuery, serde::Serialize, serde::Deserialize)]
#[state_query(OrderStream)]
pub struct UpdateOrderStatusState {
    #[id]
    order_id: OrderId,
    user_id: Option<UserId>,
    status: OrderStatus,
}

impl StateMutate for UpdateOrderStatusState {
    fn mutate(&mut self, event: Self::Event) {
        match event {
            OrderStream::OrderPlaced { user_id, .. } => {
                self.user_id = Some(user_id);
                self.status = OrderStatus::Pending;
            }
            OrderStream::OrderStatusChanged { status, .. } => self.status = status,
        }
    }
}

//-------------------------- Tests -------------------------------
