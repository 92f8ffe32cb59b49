//! 认证相关命令

use mall_cqrs_core::Command;
use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// 注册命令
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl Command for RegisterCommand {
    type Result = User;
}

/// 登录命令
///
/// 密码与 OTP 二选一：任一匹配即通过凭证检查。
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: Option<String>,
    pub otp: Option<String>,
}

impl Command for LoginCommand {
    type Result = LoginOutcome;
}

/// 登录结果
///
/// 带标签的结果类型：凭证错误和验证未完成都是普通结果，
/// 调用方不需要依赖错误/返回值的不对称来区分分支。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    /// 双通道验证都通过，签发会话令牌
    Authenticated { token: String },
    /// 用户不存在或凭证不匹配
    InvalidCredentials,
    /// 邮箱未验证；`verification_resent` 表示这次登录是否触发了重发
    NeedsEmailVerification { verification_resent: bool },
    /// 邮箱已验证但手机未验证；已向注册手机重发 OTP
    NeedsPhoneVerification,
}

/// 忘记密码命令
#[derive(Debug, Clone)]
pub struct ForgotPasswordCommand {
    pub email: String,
}

impl Command for ForgotPasswordCommand {
    type Result = ();
}

/// 重置密码命令
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub token: String,
    pub new_password: String,
}

impl Command for ResetPasswordCommand {
    type Result = ();
}
