//! Username 值对象

use serde::{Deserialize, Serialize};
use std::fmt;

/// Username 值对象
///
/// 唯一性按不区分大小写处理，但保留用户注册时的原始写法。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(pub String);

impl Username {
    /// 创建新的 Username
    pub fn new(username: impl Into<String>) -> Result<Self, UsernameError> {
        let username = username.into();

        Self::validate(&username)?;

        Ok(Self(username))
    }

    /// 验证用户名格式
    fn validate(username: &str) -> Result<(), UsernameError> {
        if username.trim().len() < 3 {
            return Err(UsernameError::TooShort);
        }

        if username.len() > 255 {
            return Err(UsernameError::TooLong);
        }

        if username.chars().any(|c| c.is_whitespace()) {
            return Err(UsernameError::ContainsWhitespace);
        }

        Ok(())
    }

    /// 用于不区分大小写比较的规范形式
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username 错误
#[derive(Debug, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is too short (minimum 3 characters)")]
    TooShort,

    #[error("Username is too long (maximum 255 characters)")]
    TooLong,

    #[error("Username must not contain whitespace")]
    ContainsWhitespace,
}

impl From<UsernameError> for mall_errors::AppError {
    fn from(err: UsernameError) -> Self {
        mall_errors::AppError::validation(err.to_string())
    }
}
