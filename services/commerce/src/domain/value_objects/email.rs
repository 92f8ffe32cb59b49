//! Email 值对象

use serde::{Deserialize, Serialize};
use std::fmt;

/// Email 值对象
///
/// 统一存储为小写，唯一性自然不区分大小写。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(pub String);

impl Email {
    /// 创建新的 Email
    pub fn new(email: impl Into<String>) -> Result<Self, EmailError> {
        let email = email.into();

        // 使用 email_address crate 进行严格的 RFC 5322 验证
        if !email_address::EmailAddress::is_valid(&email) {
            return Err(EmailError::InvalidFormat(email));
        }

        Ok(Self(email.to_lowercase()))
    }

    /// 获取邮箱域名
    pub fn domain(&self) -> Option<&str> {
        self.0.split('@').nth(1)
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email 错误
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

impl From<EmailError> for mall_errors::AppError {
    fn from(err: EmailError) -> Self {
        mall_errors::AppError::validation(err.to_string())
    }
}
