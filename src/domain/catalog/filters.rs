//! Catalog browsing filters. A filter value of `all` (or no value) matches everything.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::{CatalogError, Product};

const ALL: &str = "all";

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductFilterParams {
    pub size: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    size: Option<String>,
    color: Option<String>,
    category: Option<String>,
    price: Option<PriceRange>,
}

/// Inclusive lower bound, optional inclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: Decimal,
    max: Option<Decimal>,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl FromStr for PriceRange {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidPriceFilter(value.to_owned());

        let (min, max) = value.split_once('-').ok_or_else(invalid)?;
        let min = Decimal::from_str(min.trim()).map_err(|_| invalid())?;
        let max = match max.trim() {
            "" => None,
            max => Some(Decimal::from_str(max).map_err(|_| invalid())?),
        };

        Ok(PriceRange { min, max })
    }
}

fn active(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

impl TryFrom<ProductFilterParams> for ProductFilter {
    type Error = CatalogError;

    fn try_from(params: ProductFilterParams) -> Result<Self, Self::Error> {
        let price = active(params.price)
            .map(|price| price.parse::<PriceRange>())
            .transpose()?;

        Ok(ProductFilter {
            size: active(params.size),
            color: active(params.color),
            category: active(params.category).map(|c| c.to_lowercase()),
            price,
        })
    }
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let size_match = self
            .size
            .as_ref()
            .is_none_or(|size| product.sizes.contains(size));
        let color_match = self
            .color
            .as_ref()
            .is_none_or(|color| product.colors.contains(color));
        let category_match = self
            .category
            .as_ref()
            .is_none_or(|category| product.category.to_lowercase() == *category);
        let price_match = self
            .price
            .is_none_or(|range| range.contains(product.price));

        size_match && color_match && category_match && price_match
    }
}
