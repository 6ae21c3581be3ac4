//! Remove From Wishlist slice

use axum::{Json, extract::State, http::HeaderMap};
use disintegrate::Decision;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{DecisionMaker, DomainEvent, ProductId, UserId, users::user_id_from_headers},
    infra::ClientError,
};

use super::{WishlistError, WishlistUpdated, add_to_wishlist::WishlistState};

//------------------------- Web API ----------------------------

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromWishlistPayload {
    pub product_id: Uuid,
}

pub async fn remove_from_wishlist_endpoint(
    State(decider): State<DecisionMaker>,
    headers: HeaderMap,
    Json(payload): Json<RemoveFromWishlistPayload>,
) -> Result<Json<WishlistUpdated>, ClientError> {
    let user_id = user_id_from_headers(&headers)?;
    let product_id: ProductId = payload.product_id.try_into()?;

    let events = decider
        .make(RemoveFromWishlistCommand {
            user_id,
            product_id,
        })
        .await?;
    if !events.is_empty() {
        info!("Product {product_id} removed from wishlist of user {user_id}.");
    }

    Ok(Json(WishlistUpdated { success: true }))
}

//------------------------- Command ----------------------------

#[derive(Debug, Clone)]
pub struct RemoveFromWishlistCommand {
    pub user_id: UserId,
    pub product_id: ProductId,
}

impl Decision for RemoveFromWishlistCommand {
    type Event = DomainEvent;
    type StateQuery = WishlistState;
    type Error = WishlistError;

    fn state_query(&self) -> Self::StateQuery {
        WishlistState::new(self.user_id)
    }

    fn process(&self, state: &Self::StateQuery) -> Result<Vec<Self::Event>, Self::Error> {
        if !state.contains(&self.product_id) {
            return Ok(vec![]);
        }

        Ok(vec![DomainEvent::WishlistItemRemoved {
            user_id: self.user_id,
            product_id: self.product_id,
        }])
    }
}

//-------------------------- Tests -------------------------------
