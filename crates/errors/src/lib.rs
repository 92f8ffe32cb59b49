//! mall-errors - 统一错误处理
//!
//! 错误分类遵循 RFC 7807 Problem Details 规范。
//! 前置条件类错误（重复注册、库存不足、缺少地址等）是调用方可恢复的
//! 类型化错误，绝不折叠成笼统的 500。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not verified: {0}")]
    NotVerified(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Delivery failure: {0}")]
    DeliveryFailure(String),

    #[error("Insufficient inventory for product {product_id}")]
    InsufficientInventory { product_id: Uuid },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn not_verified(msg: impl Into<String>) -> Self {
        Self::NotVerified(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn delivery_failure(msg: impl Into<String>) -> Self {
        Self::DeliveryFailure(msg.into())
    }

    pub fn insufficient_inventory(product_id: Uuid) -> Self {
        Self::InsufficientInventory { product_id }
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::AlreadyExists(_) => 409,
            Self::NotVerified(_) => 403,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::InvalidToken(_) => 401,
            Self::DeliveryFailure(_) => 502,
            Self::InsufficientInventory { .. } => 409,
            Self::Database(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: format!("https://api.mall.example/problems/{}", self.problem_slug()),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_slug(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::AlreadyExists(_) => "already-exists",
            Self::NotVerified(_) => "not-verified",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidToken(_) => "invalid-token",
            Self::DeliveryFailure(_) => "delivery-failure",
            Self::InsufficientInventory { .. } => "insufficient-inventory",
            Self::Database(_) => "database",
            Self::Internal(_) => "internal",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::AlreadyExists(_) => "Resource Already Exists",
            Self::NotVerified(_) => "Account Not Verified",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::InvalidToken(_) => "Invalid Token",
            Self::DeliveryFailure(_) => "Notification Delivery Failure",
            Self::InsufficientInventory { .. } => "Insufficient Inventory",
            Self::Database(_) => "Database Error",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
