//! Order history slice: a user's orders folded straight from the event store.

use axum::{
    Json,
    extract::{Query, State},
};
use disintegrate::query;
use uuid::Uuid;

use crate::{
    domain::{EventReadingError, EventStore, OrderStream, UserId, read_from_events},
    infra::ClientError,
};

use super::{Order, OrderError, OrderStatus};

//------------------------- Web API ----------------------------

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrdersParams {
    pub user_id: Option<Uuid>,
}

pub async fn user_orders_endpoint(
    State(event_store): State<EventStore>,
    Query(params): Query<UserOrdersParams>,
) -> Result<Json<Vec<Order>>, ClientError> {
    let user_uuid = params.user_id.ok_or(OrderError::UserIdRequired)?;
    let user_id: UserId = user_uuid.try_into()?;
    let orders = user_orders_read_model(&event_store, &user_id).await?;
    Ok(Json(orders))
}

//----------------------- Implementation --------------------------

/// The user's orders, newest first.
pub async fn user_orders_read_model(
    event_store: &EventStore,
    user_id: &UserId,
) -> Result<Vec<Order>, EventReadingError<i64, disintegrate_postgres::Error>> {
    let query = query!(OrderStream; user_id == *user_id);
    let mut orders = read_from_events(event_store, &query, Vec::new(), apply_event).await?;
    orders.reverse();
    Ok(orders)
}

fn apply_event(mut orders: Vec<Order>, event: OrderStream) -> Vec<Order> {
    match event {
        OrderStream::OrderPlaced {
            order_id,
            user_id,
            order_number,
            items,
            total_amount,
            shipping_details,
            placed_at,
        } => orders.push(Order {
            order_id,
            order_number,
            user_id,
            items,
            total_amount,
            shipping_details,
            status: OrderStatus::Pending,
            created_at: placed_at,
        }),
        OrderStream::OrderStatusChanged {
            order_id, status, ..
        } => {
            if let Some(order) = orders.iter_mut().find(|order| order.order_id == order_id) {
                order.status = status;
            }
        }
    }
    orders
}

//-------------------------- Tests -------------------------------
