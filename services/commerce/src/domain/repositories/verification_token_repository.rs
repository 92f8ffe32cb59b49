//! 邮箱验证令牌 Repository trait

use async_trait::async_trait;
use mall_common::UserId;
use mall_errors::AppResult;

use crate::domain::user::VerificationToken;

#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// 保存令牌
    async fn save(&self, token: &VerificationToken) -> AppResult<()>;

    /// 根据令牌字符串查找
    async fn find_by_token(&self, token: &str) -> AppResult<Option<VerificationToken>>;

    /// 查找用户最新的令牌（用于重发抑制）
    async fn find_latest_by_user(&self, user_id: &UserId) -> AppResult<Option<VerificationToken>>;

    /// 删除用户的全部令牌（验证成功后）
    async fn delete_by_user(&self, user_id: &UserId) -> AppResult<()>;
}
