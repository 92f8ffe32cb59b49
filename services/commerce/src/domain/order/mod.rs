//! 订单聚合

mod order;

pub use order::{Order, OrderLine, ShippingAddress};
