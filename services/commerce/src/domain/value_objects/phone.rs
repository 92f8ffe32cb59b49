//! PhoneNumber 值对象
//!
//! 格式：`+<国家码 1-3 位> <本地号码 10 位>`，例如 `+86 1380013800` 或
//! `+1 5551234567`。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 手机号值对象
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(pub String);

impl PhoneNumber {
    /// 创建新的 PhoneNumber
    pub fn new(phone: impl Into<String>) -> Result<Self, PhoneNumberError> {
        let phone = phone.into();

        Self::validate(&phone)?;

        Ok(Self(phone))
    }

    fn validate(phone: &str) -> Result<(), PhoneNumberError> {
        let rest = phone
            .strip_prefix('+')
            .ok_or_else(|| PhoneNumberError::InvalidFormat(phone.to_string()))?;

        let (country_code, subscriber) = rest
            .split_once(' ')
            .ok_or_else(|| PhoneNumberError::InvalidFormat(phone.to_string()))?;

        let country_ok = (1..=3).contains(&country_code.len())
            && country_code.chars().all(|c| c.is_ascii_digit());
        let subscriber_ok =
            subscriber.len() == 10 && subscriber.chars().all(|c| c.is_ascii_digit());

        if !country_ok || !subscriber_ok {
            return Err(PhoneNumberError::InvalidFormat(phone.to_string()));
        }

        Ok(())
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PhoneNumber 错误
#[derive(Debug, thiserror::Error)]
pub enum PhoneNumberError {
    #[error("Invalid phone number format (expected +<country code> <10 digits>): {0}")]
    InvalidFormat(String),
}

impl From<PhoneNumberError> for mall_errors::AppError {
    fn from(err: PhoneNumberError) -> Self {
        mall_errors::AppError::validation(err.to_string())
    }
}
