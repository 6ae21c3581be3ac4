#[derive(Debug, PartialEq, thiserror::Error)]
pub enum WishlistError {
    #[error("Missing required fields: {0} is required.")]
    MissingField(&'static str),
    #[error("Wishlist item price cannot be negative.")]
    NegativePrice,
}
