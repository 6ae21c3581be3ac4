//! The cart store: line items keyed by product variant, persisted after every change.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use tracing::{error, warn};

use crate::domain::{
    ProductId,
    catalog::{MAX_PRICE, Product},
    orders::OrderItem,
};

use super::{CartSnapshot, CartTotals, pricing};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Please select a size.")]
    SizeRequired,
    #[error("Product {0} has no image.")]
    MissingImage(ProductId),
    #[error("Product {0} has a negative price.")]
    NegativePrice(ProductId),
    #[error("Product {0} is priced above {max}.", max = MAX_PRICE)]
    PriceTooHigh(ProductId),
}

/// A trimmed, non-empty size label such as `UK9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Size(String);

impl Size {
    pub fn new(label: impl Into<String>) -> Result<Self, CartError> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(CartError::SizeRequired);
        }
        Ok(Size(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Size {
    type Error = CartError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Size::new(label)
    }
}

impl FromStr for Size {
    type Err = CartError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Size::new(label)
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the cart needs to know about a product to add it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

impl ProductSummary {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Result<Self, CartError> {
        let image = image.into();
        if image.trim().is_empty() {
            return Err(CartError::MissingImage(product_id));
        }
        if price.is_sign_negative() {
            return Err(CartError::NegativePrice(product_id));
        }
        if price > MAX_PRICE {
            return Err(CartError::PriceTooHigh(product_id));
        }
        Ok(ProductSummary {
            product_id,
            name: name.into(),
            price,
            image,
        })
    }
}

impl TryFrom<&Product> for ProductSummary {
    type Error = CartError;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        let image = product
            .images
            .first()
            .ok_or(CartError::MissingImage(product.product_id))?;
        ProductSummary::new(product.product_id, &product.name, product.price, image)
    }
}

/// One product variant in the cart. Quantity is at least 1 while the item is in the cart.
///
/// The price is stored as a decimal string so a snapshot reloads it exactly. Numeric prices are
/// still accepted when loading.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub size: Size,
    pub quantity: u32,
}

impl LineItem {
    /// Saturates at `Decimal::MAX`. Only a hand-edited snapshot can get there.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    fn is_variant(&self, product_id: &ProductId, size: &Size) -> bool {
        self.product_id == *product_id && self.size == *size
    }
}

impl From<&LineItem> for OrderItem {
    fn from(item: &LineItem) -> Self {
        OrderItem {
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            size: item.size.to_string(),
            image: item.image.clone(),
        }
    }
}

/// What the last mutation did. Passed to subscribers together with the resulting items.
#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
    ItemAdded {
        product_id: ProductId,
        size: Size,
        quantity: u32,
    },
    ItemRemoved {
        product_id: ProductId,
        size: Size,
    },
    QuantityChanged {
        product_id: ProductId,
        size: Size,
        quantity: u32,
    },
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&CartChange, &[LineItem]) + Send + Sync>;

/// Owns the cart items. Every mutation is written to the snapshot and then announced to the
/// subscribers. A failed write is logged and the in-memory change is kept.
pub struct CartStore<S: CartSnapshot> {
    items: Vec<LineItem>,
    snapshot: S,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S: CartSnapshot> CartStore<S> {
    /// Rehydrates the cart from its snapshot. An unreadable snapshot yields an empty cart.
    pub fn open(snapshot: S) -> Self {
        let items = match snapshot.load() {
            Ok(items) => normalize(items),
            Err(err) => {
                warn!("Cart snapshot could not be loaded, starting with an empty cart: {err}");
                Vec::new()
            }
        };

        CartStore {
            items,
            snapshot,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Adds one of the variant, returning its new quantity.
    pub fn add_item(&mut self, product: &ProductSummary, size: Size) -> u32 {
        let quantity = match self
            .items
            .iter_mut()
            .find(|item| item.is_variant(&product.product_id, &size))
        {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            None => {
                self.items.push(LineItem {
                    product_id: product.product_id,
                    name: product.name.clone(),
                    price: product.price,
                    image: product.image.clone(),
                    size: size.clone(),
                    quantity: 1,
                });
                1
            }
        };

        self.commit(CartChange::ItemAdded {
            product_id: product.product_id,
            size,
            quantity,
        });
        quantity
    }

    /// `false` if the variant was not in the cart, in which case nothing is persisted.
    pub fn remove_item(&mut self, product_id: &ProductId, size: &Size) -> bool {
        let Some(position) = self.position(product_id, size) else {
            return false;
        };
        self.items.remove(position);

        self.commit(CartChange::ItemRemoved {
            product_id: *product_id,
            size: size.clone(),
        });
        true
    }

    /// Negative quantities count as zero, and zero removes the item. `false` if the variant was not
    /// in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, size: &Size, quantity: i64) -> bool {
        let Some(position) = self.position(product_id, size) else {
            return false;
        };

        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if quantity == 0 {
            self.items.remove(position);
            self.commit(CartChange::ItemRemoved {
                product_id: *product_id,
                size: size.clone(),
            });
        } else {
            self.items[position].quantity = quantity;
            self.commit(CartChange::QuantityChanged {
                product_id: *product_id,
                size: size.clone(),
                quantity,
            });
        }
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.commit(CartChange::Cleared);
    }

    /// Items in the order they were first added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_item_count(&self) -> u64 {
        pricing::total_item_count(&self.items)
    }

    pub fn total_value(&self) -> Decimal {
        pricing::total_value(&self.items)
    }

    pub fn totals(&self) -> CartTotals {
        pricing::totals(&self.items)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&CartChange, &[LineItem]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> S {
        self.snapshot
    }

    fn position(&self, product_id: &ProductId, size: &Size) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.is_variant(product_id, size))
    }

    fn commit(&mut self, change: CartChange) {
        if let Err(err) = self.snapshot.save(&self.items) {
            error!("Cart snapshot could not be saved after {change:?}: {err}");
        }
        for (_, observer) in &self.observers {
            observer(&change, self.items.as_slice());
        }
    }
}

impl<S: CartSnapshot + fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("snapshot", &self.snapshot)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Merges duplicate variants and drops zero quantities, keeping first-seen order.
fn normalize(stored: Vec<LineItem>) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::with_capacity(stored.len());
    for item in stored.into_iter().filter(|item| item.quantity > 0) {
        match items
            .iter_mut()
            .find(|existing| existing.is_variant(&item.product_id, &item.size))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => items.push(item),
        }
    }
    items
}
