//! 密码服务

use mall_errors::{AppError, AppResult};

use crate::domain::value_objects::HashedPassword;

/// 密码服务
///
/// 对值对象的哈希/校验做薄封装，把值对象错误映射到应用错误。
pub struct PasswordService;

impl PasswordService {
    /// 哈希明文密码（校验策略后）
    pub fn hash_password(plain: &str) -> AppResult<HashedPassword> {
        HashedPassword::from_plain(plain).map_err(AppError::from)
    }

    /// 校验明文密码
    pub fn verify_password(plain: &str, hash: &HashedPassword) -> AppResult<bool> {
        hash.verify(plain)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = PasswordService::hash_password("secret1").unwrap();

        assert!(PasswordService::verify_password("secret1", &hash).unwrap());
        assert!(!PasswordService::verify_password("wrong99", &hash).unwrap());
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(PasswordService::hash_password("short").is_err());
    }
}
