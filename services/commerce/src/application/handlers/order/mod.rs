//! 订单处理器

mod place_order_handler;

pub use place_order_handler::PlaceOrderHandler;
