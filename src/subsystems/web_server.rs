use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use futures::FutureExt;
use tokio::select;
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemHandle};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    AppState,
    domain::{catalog, dashboard, orders, users, wishlist},
    infra::ClientError,
};

pub struct WebServer {
    state: AppState,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/orders",
            post(orders::place_order_endpoint).get(orders::user_orders_endpoint),
        )
        .route("/api/orders/recent", get(orders::recent_orders_endpoint))
        .route(
            "/api/orders/{order_id}/status",
            post(orders::update_order_status_endpoint),
        )
        .route(
            "/api/dashboard/stats",
            get(dashboard::dashboard_stats_endpoint),
        )
        .route(
            "/api/products",
            get(catalog::list_products_endpoint).post(catalog::create_product_endpoint),
        )
        .route(
            "/api/products/{product_id}",
            get(catalog::product_endpoint)
                .put(catalog::update_product_endpoint)
                .delete(catalog::delete_product_endpoint),
        )
        .route(
            "/api/wishlist",
            get(wishlist::wishlist_items_endpoint)
                .post(wishlist::add_to_wishlist_endpoint)
                .delete(wishlist::remove_from_wishlist_endpoint),
        )
        .route("/api/auth/signup", post(users::signup_endpoint))
        .route("/api/register", post(users::signup_endpoint))
        .route("/api/auth/signin", post(users::signin_endpoint))
        .route("/healthcheck", get(health_check_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[async_trait]
impl IntoSubsystem<anyhow::Error> for WebServer {
    async fn run(self, subsys: SubsystemHandle) -> Result<(), anyhow::Error> {
        let address = self.state.settings.application.address();
        let socket_addr: SocketAddr = address.parse()
            .inspect_err(|e| error!("Could not parse server address {address}.\nCheck application host and port in configuration settings.\nFailed with {e}"))?;

        let router = router(self.state);

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .inspect_err(|e| {
                error!("Could not bind socket address {socket_addr}. Failed with {e}")
            })?;

        info!("Web server starting on http://{socket_addr}");
        select!(
            result = axum::serve(listener, router.into_make_service()).into_future().map(|result| result.map_err(anyhow::Error::new)) => {
                error!("Web server completed with {result:?}");
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Web server shutdown");
            }
        );
        Ok(())
    }
}

pub async fn health_check_endpoint(
    State(_app_state): State<AppState>,
) -> Result<Json<String>, ClientError> {
    Ok(Json("Ok".to_owned()))
}
