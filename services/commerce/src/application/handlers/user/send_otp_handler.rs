//! 发送 OTP 处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_cqrs_core::CommandHandler;
use mall_errors::AppResult;
use tracing::warn;

use crate::application::commands::user::SendOtpCommand;
use crate::domain::services::{OtpDelivery, OtpService};
use crate::domain::unit_of_work::UnitOfWorkFactory;

/// 发送 OTP 处理器
///
/// 永不返回 Err：找不到用户/手机号或短信网关失败都表达为
/// `OtpDelivery::Failed`。
pub struct SendOtpHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    otp_service: Arc<OtpService>,
}

impl SendOtpHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, otp_service: Arc<OtpService>) -> Self {
        Self {
            uow_factory,
            otp_service,
        }
    }
}

#[async_trait]
impl CommandHandler<SendOtpCommand> for SendOtpHandler {
    async fn handle(&self, command: SendOtpCommand) -> AppResult<OtpDelivery> {
        let uow = self.uow_factory.begin().await?;
        let user = uow.users().find_by_username_ci(&command.username).await?;
        uow.rollback().await?;

        let Some(user) = user else {
            warn!(username = %command.username, "OTP requested for unknown username");
            return Ok(OtpDelivery::Failed {
                message: "Unknown username".to_string(),
            });
        };

        let Some(phone) = &user.phone else {
            warn!(user_id = %user.id, "OTP requested but no phone on file");
            return Ok(OtpDelivery::Failed {
                message: "No phone number on file".to_string(),
            });
        };

        Ok(self
            .otp_service
            .issue(user.username.as_str(), phone.as_str())
            .await)
    }
}
