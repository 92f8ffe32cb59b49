//! 校验 OTP 处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_cqrs_core::CommandHandler;
use mall_errors::{AppError, AppResult};
use tracing::info;

use crate::application::commands::user::{OtpValidation, ValidateOtpCommand};
use crate::domain::services::OtpStore;
use crate::domain::unit_of_work::UnitOfWorkFactory;

/// 校验 OTP 处理器
///
/// 比对与删除是一个原子操作：首次匹配即消费，重放必然失败；
/// 不匹配时存储的验证码保持原样。
pub struct ValidateOtpHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    otp_store: Arc<dyn OtpStore>,
}

impl ValidateOtpHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, otp_store: Arc<dyn OtpStore>) -> Self {
        Self {
            uow_factory,
            otp_store,
        }
    }
}

#[async_trait]
impl CommandHandler<ValidateOtpCommand> for ValidateOtpHandler {
    async fn handle(&self, command: ValidateOtpCommand) -> AppResult<OtpValidation> {
        if !self
            .otp_store
            .take_if_match(&command.username, &command.code)
            .await
        {
            return Ok(OtpValidation::Invalid);
        }

        // 首次匹配：持久化手机已验证
        let uow = self.uow_factory.begin().await?;

        let mut user = uow
            .users()
            .find_by_username_ci(&command.username)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("User '{}' not found", command.username))
            })?;

        user.mark_phone_verified();
        uow.users().update(&user).await?;
        uow.commit().await?;

        info!(user_id = %user.id, "Phone verified via OTP");

        Ok(OtpValidation::Valid)
    }
}
