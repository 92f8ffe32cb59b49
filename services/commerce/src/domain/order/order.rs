//! 订单实体

use chrono::{DateTime, Utc};
use mall_common::{OrderId, ProductId, UserId};
use mall_domain_core::{Money, Quantity};
use serde::{Deserialize, Serialize};

use crate::domain::user::Address;

/// 收货地址快照
///
/// 下单时从用户地址簿拷贝的值，之后地址簿怎么改都不影响已下订单。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
}

impl From<Address> for ShippingAddress {
    fn from(address: Address) -> Self {
        Self {
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            country: address.country,
        }
    }
}

/// 订单行
///
/// 单价是下单时刻的快照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub unit_price: Money,
}

/// 订单实体
///
/// 收货地址在下单时从用户的第一个地址快照；订单行只在对应的
/// 库存扣减成功后追加，整单落库一次。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub ship_to: ShippingAddress,
    pub ordered_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// 创建待填充订单（前置条件满足后、扣减库存前）
    pub fn new(user_id: UserId, ship_to: ShippingAddress) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            ship_to,
            ordered_at: Utc::now(),
            lines: Vec::new(),
        }
    }

    /// 追加一行（对应的库存扣减已成功）
    pub fn add_line(&mut self, product_id: ProductId, quantity: Quantity, unit_price: Money) {
        self.lines.push(OrderLine {
            product_id,
            quantity,
            unit_price,
        });
    }

    /// 订单总额
    pub fn total(&self) -> Option<Money> {
        let mut lines = self.lines.iter();
        let first = lines.next()?;
        let mut total = first.unit_price.clone() * first.quantity.value();

        for line in lines {
            total = total + line.unit_price.clone() * line.quantity.value();
        }

        Some(total)
    }
}
