//! 邮箱验证令牌实体

use chrono::{DateTime, Utc};
use mall_common::{UserId, VerificationTokenId};
use serde::{Deserialize, Serialize};

/// 邮箱验证令牌
///
/// 令牌字符串本身是一个嵌入邮箱地址的签名 JWT；此记录只负责
/// 重发抑制和"验证成功后全部删除"的生命周期管理。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: VerificationTokenId,
    pub user_id: UserId,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn new(user_id: UserId, token: String) -> Self {
        Self {
            id: VerificationTokenId::new(),
            user_id,
            token,
            created_at: Utc::now(),
        }
    }

    /// 是否早于给定的分钟数
    pub fn is_older_than_minutes(&self, minutes: i64) -> bool {
        Utc::now() - self.created_at > chrono::Duration::minutes(minutes)
    }
}
