//! 下单命令

use mall_common::{ProductId, UserId};
use mall_cqrs_core::Command;

use crate::domain::order::Order;

/// 请求的订单行
#[derive(Debug, Clone)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// 下单命令
#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    pub user_id: UserId,
    pub lines: Vec<OrderLineRequest>,
}

impl Command for PlaceOrderCommand {
    type Result = Order;
}
