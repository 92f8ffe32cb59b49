//! 用户自助操作的命令与查询

use mall_common::UserId;
use mall_cqrs_core::{Command, Query};
use serde::{Deserialize, Serialize};

use crate::domain::services::OtpDelivery;
use crate::domain::user::Address;

/// 验证邮箱命令
///
/// 结果为 bool：未知令牌和重复验证都返回 false（幂等）。
#[derive(Debug, Clone)]
pub struct VerifyEmailCommand {
    pub token: String,
}

impl Command for VerifyEmailCommand {
    type Result = bool;
}

/// 发送 OTP 命令
#[derive(Debug, Clone)]
pub struct SendOtpCommand {
    pub username: String,
}

impl Command for SendOtpCommand {
    type Result = OtpDelivery;
}

/// 校验 OTP 命令
#[derive(Debug, Clone)]
pub struct ValidateOtpCommand {
    pub username: String,
    pub code: String,
}

impl Command for ValidateOtpCommand {
    type Result = OtpValidation;
}

/// OTP 校验结果
///
/// 验证码不匹配是普通结果，不是错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpValidation {
    Valid,
    Invalid,
}

/// 更新联系手机命令
///
/// `actor_id` 是发起人，`user_id` 是目标用户；所有权守卫先行。
#[derive(Debug, Clone)]
pub struct UpdateContactCommand {
    pub actor_id: UserId,
    pub user_id: UserId,
    pub phone: String,
}

impl Command for UpdateContactCommand {
    type Result = ();
}

/// 新增收货地址命令
#[derive(Debug, Clone)]
pub struct AddAddressCommand {
    pub actor_id: UserId,
    pub user_id: UserId,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
}

impl Command for AddAddressCommand {
    type Result = Address;
}

/// 收货地址列表查询
#[derive(Debug, Clone)]
pub struct ListAddressesQuery {
    pub actor_id: UserId,
    pub user_id: UserId,
}

impl Query for ListAddressesQuery {
    type Result = Vec<Address>;
}
