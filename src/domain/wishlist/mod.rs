mod add_to_wishlist;
mod errors;
mod remove_from_wishlist;
mod wishlist_items;

pub use add_to_wishlist::{AddToWishlistCommand, AddToWishlistPayload, add_to_wishlist_endpoint};
pub use errors::WishlistError;
pub use remove_from_wishlist::{
    RemoveFromWishlistCommand, RemoveFromWishlistPayload, remove_from_wishlist_endpoint,
};
pub use wishlist_items::{
    WishlistItem, WishlistItems, wishlist_items_endpoint, wishlist_items_read_model,
};

/// Body returned by the wishlist mutations.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct WishlistUpdated {
    pub success: bool,
}
