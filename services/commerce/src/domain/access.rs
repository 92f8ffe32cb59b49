//! 访问控制守卫
//!
//! 纯函数判定，处理器在触碰目标资源之前先短路。

use mall_common::UserId;

use crate::domain::user::User;

/// 用户是否拥有给定 ID 标识的资源
pub fn user_owns(user: &User, owner_id: &UserId) -> bool {
    user.id == *owner_id
}

/// 用户名是否与用户精确匹配（区分大小写）
pub fn user_owns_username(user: &User, username: &str) -> bool {
    user.username.as_str() == username
}
