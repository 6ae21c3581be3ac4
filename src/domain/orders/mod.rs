mod errors;
mod model;
mod orders_from_db;
mod place_order;
mod update_order_status;
mod user_orders;

pub use errors::OrderError;
pub use model::{
    MAX_ORDER_TOTAL, Order, OrderItem, OrderStatus, ShippingDetails, order_number, subtotal,
};
pub use orders_from_db::{
    OrdersReadModelProjection, orders_from_db_read_model_reset, recent_orders,
    recent_orders_endpoint,
};
pub use place_order::{PlaceOrderCommand, PlaceOrderPayload, place_order_endpoint};
pub use update_order_status::{
    UpdateOrderStatusCommand, UpdateOrderStatusPayload, update_order_status_endpoint,
};
pub use user_orders::{UserOrdersParams, user_orders_endpoint, user_orders_read_model};
