//! 用户 Repository trait

use async_trait::async_trait;
use mall_common::UserId;
use mall_errors::AppResult;

use crate::domain::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 根据用户名查找用户（不区分大小写）
    async fn find_by_username_ci(&self, username: &str) -> AppResult<Option<User>>;

    /// 根据邮箱查找用户（不区分大小写）
    async fn find_by_email_ci(&self, email: &str) -> AppResult<Option<User>>;

    /// 保存新用户
    async fn save(&self, user: &User) -> AppResult<()>;

    /// 更新已有用户
    async fn update(&self, user: &User) -> AppResult<()>;
}
