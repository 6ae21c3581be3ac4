//! Derived cart figures. Always recomputed from the items, never stored.

use rust_decimal::Decimal;

use super::LineItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_item_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
}

/// Sum of quantities.
pub fn total_item_count(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of `price * quantity`, exact below `Decimal::MAX` and saturating above it.
pub fn total_value(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()))
}

pub fn totals(items: &[LineItem]) -> CartTotals {
    CartTotals {
        total_item_count: total_item_count(items),
        total_value: total_value(items),
    }
}
