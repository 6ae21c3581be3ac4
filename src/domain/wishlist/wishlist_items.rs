//! Wishlist slice: the user's wished-for products, folded straight from the event store.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use disintegrate::query;
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        EventReadingError, EventStore, ProductId, UserId, WishlistStream, read_from_events,
        users::user_id_from_headers,
    },
    infra::ClientError,
};

//------------------------- Web API ----------------------------

pub async fn wishlist_items_endpoint(
    State(event_store): State<EventStore>,
    headers: HeaderMap,
) -> Result<Json<WishlistItems>, ClientError> {
    let user_id = user_id_from_headers(&headers)?;
    let items = wishlist_items_read_model(&event_store, &user_id).await?;
    Ok(Json(items))
}

//------------------------- Read Model ---------------------------

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub added_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WishlistItems {
    pub items: Vec<WishlistItem>,
}

pub async fn wishlist_items_read_model(
    event_store: &EventStore,
    user_id: &UserId,
) -> Result<WishlistItems, EventReadingError<i64, disintegrate_postgres::Error>> {
    let query = query!(WishlistStream; user_id == *user_id);
    read_from_events(event_store, &query, WishlistItems::default(), apply_event).await
}

fn apply_event(mut wishlist: WishlistItems, event: WishlistStream) -> WishlistItems {
    match event {
        WishlistStream::WishlistItemAdded {
            product_id,
            name,
            price,
            image,
            added_at,
            ..
        } => {
            if !wishlist.items.iter().any(|item| item.product_id == product_id) {
                wishlist.items.push(WishlistItem {
                    product_id,
                    name,
                    price,
                    image,
                    added_at,
                });
            }
        }
        WishlistStream::WishlistItemRemoved { product_id, .. } => {
            wishlist.items.retain(|item| item.product_id != product_id);
        }
    }
    wishlist
}

//-------------------------- Tests -------------------------------
