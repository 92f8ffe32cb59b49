//! 用户实体

use chrono::{DateTime, Utc};
use mall_common::{AuditInfo, UserId};
use mall_domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Email, HashedPassword, PhoneNumber, Username};

/// 用户实体
///
/// 双通道验证：邮箱通过一次性链接验证，手机通过 OTP 验证。
/// 两个通道都验证通过后才允许签发会话令牌。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<PhoneNumber>,
    // 邮箱验证
    pub email_verified: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    // 手机验证
    pub phone_verified: bool,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub audit_info: AuditInfo,
}

impl User {
    pub fn new(
        username: Username,
        email: Email,
        password_hash: HashedPassword,
        first_name: String,
        last_name: String,
        phone: Option<PhoneNumber>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            email_verified: false,
            email_verified_at: None,
            phone_verified: false,
            phone_verified_at: None,
            audit_info: AuditInfo::default(),
        }
    }

    /// 标记邮箱已验证
    pub fn mark_email_verified(&mut self) {
        self.email_verified = true;
        self.email_verified_at = Some(Utc::now());
        self.audit_info.touch();

        tracing::info!(user_id = %self.id, email = %self.email, "Email verified");
    }

    /// 标记手机已验证
    pub fn mark_phone_verified(&mut self) {
        self.phone_verified = true;
        self.phone_verified_at = Some(Utc::now());
        self.audit_info.touch();

        tracing::info!(user_id = %self.id, "Phone verified");
    }

    /// 设置/更换手机号
    ///
    /// 更换号码后必须重新通过 OTP 验证。
    pub fn set_phone(&mut self, phone: PhoneNumber) {
        self.phone = Some(phone);
        self.phone_verified = false;
        self.phone_verified_at = None;
        self.audit_info.touch();
    }

    /// 更新密码哈希
    pub fn update_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.audit_info.touch();
    }

    /// 两个验证通道是否都已通过
    pub fn is_fully_verified(&self) -> bool {
        self.email_verified && self.phone_verified
    }

    /// 是否有已验证的联系手机
    pub fn has_verified_contact(&self) -> bool {
        self.phone.is_some() && self.phone_verified
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for User {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}
