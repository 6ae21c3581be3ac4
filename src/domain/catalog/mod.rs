mod errors;
mod filters;
mod products;

pub use errors::CatalogError;
pub use filters::{PriceRange, ProductFilter, ProductFilterParams};
pub use products::{
    MAX_PRICE, Product, ProductPayload, all_products, create_product_endpoint, delete_product,
    delete_product_endpoint, find_product, insert_product, list_products_endpoint,
    product_endpoint, update_product, update_product_endpoint,
};
