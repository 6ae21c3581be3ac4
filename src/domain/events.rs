use jiff::Timestamp;
use rust_decimal::Decimal;

use super::{
    OrderId, ProductId, UserId,
    orders::{OrderItem, OrderStatus, ShippingDetails},
};

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, disintegrate::Event)]
#[stream(OrderStream, [OrderPlaced, OrderStatusChanged])]
#[stream(WishlistStream, [WishlistItemAdded, WishlistItemRemoved])]
pub enum DomainEvent {
    OrderPlaced {
        #[id]
        order_id: OrderId,
        #[id]
        user_id: UserId,
        order_number: String,
        items: Vec<OrderItem>,
        total_amount: Decimal,
        shipping_details: ShippingDetails,
        placed_at: Timestamp,
    },
    OrderStatusChanged {
        #[id]
        order_id: OrderId,
        #[id]
        user_id: UserId,
        status: OrderStatus,
    },
    WishlistItemAdded {
        #[id]
        user_id: UserId,
        #[id]
        product_id: ProductId,
        name: String,
        price: Decimal,
        image: String,
        added_at: Timestamp,
    },
    WishlistItemRemoved {
        #[id]
        user_id: UserId,
        #[id]
        product_id: ProductId,
    },
}
