use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use disintegrate::DecisionError;
use tracing::error;

use crate::domain::{
    catalog::CatalogError, orders::OrderError, users::UserError, wishlist::WishlistError,
};

#[derive(Debug)]
pub enum ClientError {
    Orders(OrderError),
    Wishlist(WishlistError),
    Catalog(CatalogError),
    Users(UserError),
    Payload(String),
    Unauthorized,
    Internal(anyhow::Error),
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        #[derive(serde::Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let (status, error) = match self {
            ClientError::Orders(order_error) => {
                let status = match order_error {
                    OrderError::OrderDoesNotExist(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, order_error.to_string())
            }
            ClientError::Wishlist(wishlist_error) => {
                (StatusCode::BAD_REQUEST, wishlist_error.to_string())
            }
            ClientError::Catalog(catalog_error) => {
                let status = match catalog_error {
                    CatalogError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, catalog_error.to_string())
            }
            ClientError::Users(user_error) => {
                let status = match user_error {
                    UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    UserError::AdminRequired => StatusCode::FORBIDDEN,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, user_error.to_string())
            }
            ClientError::Payload(message) => (StatusCode::BAD_REQUEST, message),
            ClientError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_owned()),
            ClientError::Internal(err) => {
                error!("Request failed: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Please ask your system administrator to check the logs.".to_owned(),
                )
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl<E> From<DecisionError<E>> for ClientError
where
    E: Into<ClientError>,
{
    fn from(decision_error: DecisionError<E>) -> Self {
        match decision_error {
            DecisionError::Domain(domain_error) => domain_error.into(),
            DecisionError::EventStore(err) => {
                ClientError::Internal(anyhow::anyhow!("EventStore problem: {err}"))
            }
            DecisionError::StateStore(err) => {
                ClientError::Internal(anyhow::anyhow!("StateStore problem: {err}"))
            }
        }
    }
}

impl From<OrderError> for ClientError {
    fn from(order_error: OrderError) -> Self {
        ClientError::Orders(order_error)
    }
}

impl From<WishlistError> for ClientError {
    fn from(wishlist_error: WishlistError) -> Self {
        ClientError::Wishlist(wishlist_error)
    }
}

impl From<CatalogError> for ClientError {
    fn from(catalog_error: CatalogError) -> Self {
        ClientError::Catalog(catalog_error)
    }
}

impl From<UserError> for ClientError {
    fn from(user_error: UserError) -> Self {
        ClientError::Users(user_error)
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(value: anyhow::Error) -> Self {
        ClientError::Internal(value)
    }
}
