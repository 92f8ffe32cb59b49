//! Password 值对象
//!
//! 密码策略：6-128 个字符，至少一个字母和一个数字。
//! 哈希使用 Argon2（随机盐）。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_LENGTH: usize = 6;
const MAX_LENGTH: usize = 128;

/// 哈希后的密码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(pub String);

impl HashedPassword {
    /// 从明文密码创建哈希密码
    pub fn from_plain(plain_password: &str) -> Result<Self, PasswordError> {
        Password::validate(plain_password)?;

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(Self(password_hash))
    }

    /// 验证明文密码是否匹配
    pub fn verify(&self, plain_password: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(&self.0).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plain_password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// 从已有的哈希字符串创建
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// 明文密码（仅用于验证，不持久化）
pub struct Password(String);

impl Password {
    /// 创建新的 Password（验证后）
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordError> {
        let password = password.into();
        Self::validate(&password)?;
        Ok(Self(password))
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 验证密码策略
    pub fn validate(password: &str) -> Result<(), PasswordError> {
        if password.len() < MIN_LENGTH {
            return Err(PasswordError::TooShort(MIN_LENGTH));
        }

        if password.len() > MAX_LENGTH {
            return Err(PasswordError::TooLong(MAX_LENGTH));
        }

        let has_letter = password.chars().any(|c| c.is_alphabetic());
        let has_digit = password.chars().any(|c| c.is_numeric());

        if !has_letter || !has_digit {
            return Err(PasswordError::MissingLetterOrDigit);
        }

        Ok(())
    }
}

/// Password 错误
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password is too short (minimum {0} characters)")]
    TooShort(usize),

    #[error("Password is too long (maximum {0} characters)")]
    TooLong(usize),

    #[error("Password must contain at least one letter and one digit")]
    MissingLetterOrDigit,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}

impl From<PasswordError> for mall_errors::AppError {
    fn from(err: PasswordError) -> Self {
        mall_errors::AppError::validation(err.to_string())
    }
}
