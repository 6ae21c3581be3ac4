//! Admin dashboard headline figures.

use anyhow::Context;
use axum::{Json, extract::State, http::HeaderMap};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    domain::users::{Role, require_admin},
    infra::ClientError,
};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    /// Registered customer accounts. Admins are not counted.
    pub total_customers: i64,
    pub total_products: i64,
}

pub async fn dashboard_stats_endpoint(
    State(pool): State<PgPool>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, ClientError> {
    require_admin(&pool, &headers).await?;
    Ok(Json(dashboard_stats(&pool).await?))
}

pub async fn dashboard_stats(pool: &PgPool) -> Result<DashboardStats, anyhow::Error> {
    sqlx::query_as(
        r#"SELECT
               (SELECT COUNT(*) FROM orders) AS total_orders,
               (SELECT COALESCE(SUM(total_amount), 0) FROM orders) AS total_sales,
               (SELECT COUNT(*) FROM users WHERE role = $1) AS total_customers,
               (SELECT COUNT(*) FROM products) AS total_products"#,
    )
    .bind(Role::Customer)
    .fetch_one(pool)
    .await
    .context("Problem in dashboard_stats.")
}
