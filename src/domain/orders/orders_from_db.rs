//! Orders read model as a database projection. Backs the recent orders list and dashboard stats.

use anyhow::Context;
use async_trait::async_trait;
use axum::{Json, extract::State};
use disintegrate::{EventListener, PersistedEvent, StreamQuery, query};
use jiff_sqlx::{Timestamp, ToSqlx};
use rust_decimal::Decimal;
use sqlx::{PgPool, types::Json as SqlJson};

use crate::{
    domain::{OrderId, OrderStream, UserId},
    infra::{ClientError, Settings},
};

use super::{Order, OrderItem, OrderStatus, ShippingDetails};

//------------------------- Web API ----------------------------

pub async fn recent_orders_endpoint(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
) -> Result<Json<Vec<Order>>, ClientError> {
    let orders = recent_orders(&pool, settings.orders.recent_orders_limit).await?;
    Ok(Json(orders))
}

//----------------------- Read Model API ------------------------

#[derive(sqlx::FromRow, Debug, Clone)]
struct OrderRow {
    order_id: OrderId,
    order_number: String,
    user_id: UserId,
    items: SqlJson<Vec<OrderItem>>,
    total_amount: Decimal,
    shipping_details: SqlJson<ShippingDetails>,
    status: OrderStatus,
    placed_at: Timestamp,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            order_id: row.order_id,
            order_number: row.order_number,
            user_id: row.user_id,
            items: row.items.0,
            total_amount: row.total_amount,
            shipping_details: row.shipping_details.0,
            status: row.status,
            created_at: row.placed_at.to_jiff(),
        }
    }
}

/// The most recently placed orders across all users, newest first.
pub async fn recent_orders(pool: &PgPool, limit: i64) -> Result<Vec<Order>, anyhow::Error> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        r#"SELECT order_id, order_number, user_id, items, total_amount, shipping_details, status, placed_at
           FROM orders
           ORDER BY placed_at DESC, last_event_id DESC
           LIMIT $1"#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .with_context(|| format!("Problem in recent_orders(limit: {limit})"))?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn orders_from_db_read_model_reset(pool: &PgPool) -> Result<(), anyhow::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM orders;")
        .execute(&mut *tx)
        .await
        .context("Problem in orders_from_db_read_model_reset.")?;

    sqlx::query("update event_listener set last_processed_event_id = 0 where id = $1;")
        .bind(PROJECTION_ID)
        .execute(&mut *tx)
        .await
        .context("Problem in orders_from_db_read_model_reset.")?;

    tx.commit()
        .await
        .context("Problem in orders_from_db_read_model_reset.")
}

//------------------------- Projection --------------------------

const PROJECTION_ID: &str = "orders_from_db";

#[derive(Clone)]
pub struct OrdersReadModelProjection {
    pool: PgPool,
    query: StreamQuery<i64, OrderStream>,
}

impl OrdersReadModelProjection {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query: query!(OrderStream),
        }
    }
}

#[async_trait]
impl EventListener<i64, OrderStream> for OrdersReadModelProjection {
    type Error = anyhow::Error;

    fn id(&self) -> &'static str {
        PROJECTION_ID
    }

    fn query(&self) -> &StreamQuery<i64, OrderStream> {
        &self.query
    }

    async fn handle(&self, event: PersistedEvent<i64, OrderStream>) -> Result<(), Self::Error> {
        let last_event_id = event.id();
        match event.into_inner() {
            OrderStream::OrderPlaced {
                order_id,
                user_id,
                order_number,
                items,
                total_amount,
                shipping_details,
                placed_at,
            } => {
                let order = Order {
                    order_id,
                    order_number,
                    user_id,
                    items,
                    total_amount,
                    shipping_details,
                    status: OrderStatus::Pending,
                    created_at: placed_at,
                };
                insert_order(&self.pool, &order, last_event_id).await
            }
            OrderStream::OrderStatusChanged {
                order_id, status, ..
            } => update_status(&self.pool, &order_id, status, last_event_id).await,
        }
    }
}

//--------------------------- SQL -------------------------------

async fn insert_order(pool: &PgPool, order: &Order, last_event_id: i64) -> Result<(), anyhow::Error> {
    let order_id = order.order_id;
    sqlx::query(
        r#"INSERT INTO orders
           (order_id, order_number, user_id, items, total_amount, shipping_details, status, placed_at, last_event_id)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
           ON CONFLICT(order_id) DO NOTHING"#,
    )
    .bind(order.order_id)
    .bind(&order.order_number)
    .bind(order.user_id)
    .bind(SqlJson(&order.items))
    .bind(order.total_amount)
    .bind(SqlJson(&order.shipping_details))
    .bind(order.status)
    .bind(order.created_at.to_sqlx())
    .bind(last_event_id)
    .execute(pool)
    .await
    .with_context(|| format!("Problem in insert_order(order_id: {order_id}, last_event_id: {last_event_id})."))?;
    Ok(())
}

async fn update_status(
    pool: &PgPool,
    order_id: &OrderId,
    status: OrderStatus,
    last_event_id: i64,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"UPDATE orders
           SET status = $1, last_event_id = $2
           WHERE order_id = $3 and last_event_id < $2"#,
    )
    .bind(status)
    .bind(last_event_id)
    .bind(order_id)
    .execute(pool)
    .await
    .with_context(|| format!("Problem in update_status(order_id: {order_id}, status: {status}, last_event_id: {last_event_id})."))?;
    Ok(())
}

//-------------------------- Tests -------------------------------
