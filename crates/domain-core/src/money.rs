//! 货币值对象

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// 货币代码
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(pub String);

impl Currency {
    pub fn new(code: &str) -> Self {
        Self(code.to_uppercase())
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }
}

/// 金额值对象
///
/// 以最小货币单位存储（如美分），避免浮点误差。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn usd(amount: i64) -> Self {
        Self::new(amount, Currency::usd())
    }

    /// 转换为浮点数（仅用于显示）
    pub fn to_decimal(&self) -> f64 {
        self.amount as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        assert_eq!(
            self.currency, other.currency,
            "Cannot add money with different currencies"
        );
        Self::new(self.amount + other.amount, self.currency)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, multiplier: i64) -> Self {
        Self::new(self.amount * multiplier, self.currency)
    }
}
