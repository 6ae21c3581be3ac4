//! Add To Wishlist slice

use std::collections::BTreeSet;

use axum::{Json, extract::State, http::HeaderMap};
use disintegrate::{Decision, StateMutate, StateQuery};
use jiff::Timestamp;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{
        DecisionMaker, DomainEvent, ProductId, UserId, WishlistStream, users::user_id_from_headers,
    },
    infra::ClientError,
};

use super::{WishlistError, WishlistUpdated};

//------------------------- Web API ----------------------------

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddToWishlistPayload {
    pub product_id: Option<Uuid>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub image: String,
}

pub async fn add_to_wishlist_endpoint(
    State(decider): State<DecisionMaker>,
    headers: HeaderMap,
    Json(payload): Json<AddToWishlistPayload>,
) -> Result<Json<WishlistUpdated>, ClientError> {
    let user_id = user_id_from_headers(&headers)?;

    let product_uuid = payload
        .product_id
        .ok_or(WishlistError::MissingField("productId"))?;
    let product_id: ProductId = product_uuid.try_into()?;
    if payload.name.trim().is_empty() {
        return Err(WishlistError::MissingField("name").into());
    }
    let price = payload.price.ok_or(WishlistError::MissingField("price"))?;
    if payload.image.trim().is_empty() {
        return Err(WishlistError::MissingField("image").into());
    }

    let events = decider
        .make(AddToWishlistCommand {
            user_id,
            product_id,
            name: payload.name,
            price,
            image: payload.image,
            added_at: Timestamp::now(),
        })
        .await?;
    if !events.is_empty() {
        info!("Product {product_id} added to wishlist of user {user_id}.");
    }

    Ok(Json(WishlistUpdated { success: true }))
}

//------------------------- Command ----------------------------

#[derive(Debug, Clone)]
pub struct AddToWishlistCommand {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub added_at: Timestamp,
}

impl Decision for AddToWishlistCommand {
    type Event = DomainEvent;
    type StateQuery = WishlistState;
    type Error = WishlistError;

    fn state_query(&self) -> Self::StateQuery {
        WishlistState {
            user_id: self.user_id,
            products: BTreeSet::new(),
        }
    }

    fn process(&self, state: &Self::StateQuery) -> Result<Vec<Self::Event>, Self::Error> {
        if self.price.is_sign_negative() {
            return Err(WishlistError::NegativePrice);
        }

        // Already wished for.
        if state.products.contains(&self.product_id) {
            return Ok(vec![]);
        }

        Ok(vec![DomainEvent::WishlistItemAdded {
            user_id: self.user_id,
            product_id: self.product_id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            added_at: self.added_at,
        }])
    }
}

//---------------------- Command State --------------------------

/// The products currently on a user's wishlist.
#[derive(Clone, Debug, PartialEq, Eq, StateQuery, serde::Serialize, serde::Deserialize)]
#[state_query(WishlistStream)]
pub struct WishlistState {
    #[id]
    user_id: UserId,
    products: BTreeSet<ProductId>,
}

impl WishlistState {
    pub fn new(user_id: UserId) -> Self {
        WishlistState {
            user_id,
            products: BTreeSet::new(),
        }
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.contains(product_id)
    }
}

impl StateMutate for WishlistState {
    fn mutate(&mut self, event: Self::Event) {
        match event {
            WishlistStream::WishlistItemAdded { product_id, .. } => {
                self.products.insert(product_id);
            }
            WishlistStream::WishlistItemRemoved { product_id, .. } => {
                self.products.remove(&product_id);
            }
        }
    }
}

//-------------------------- Tests -------------------------------
