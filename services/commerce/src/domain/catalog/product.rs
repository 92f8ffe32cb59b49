//! 商品实体
//!
//! 库存以商品为键的余量计数存在，不单独建模实体；余量不变式
//! 由仓储的条件扣减保证。

use mall_common::ProductId;
use mall_domain_core::Money;
use serde::{Deserialize, Serialize};

/// 商品实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Money,
}

impl Product {
    pub fn new(name: String, description: Option<String>, category: String, price: Money) -> Self {
        Self {
            id: ProductId::new(),
            name,
            description,
            category,
            price,
        }
    }
}

