use crate::domain::ProductId;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Product not found")]
    ProductNotFound(ProductId),
    #[error("Product {0} is required.")]
    MissingField(&'static str),
    #[error("Product price cannot be negative.")]
    NegativePrice,
    #[error("Product price cannot exceed {max}.", max = super::MAX_PRICE)]
    PriceTooHigh,
    #[error("Invalid price filter '{0}'. Expected 'min-max' or 'min-'.")]
    InvalidPriceFilter(String),
}
