//! 重置密码处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_auth_core::TokenService;
use mall_cqrs_core::CommandHandler;
use mall_errors::AppResult;
use tracing::{info, warn};

use crate::application::commands::auth::ResetPasswordCommand;
use crate::domain::services::PasswordService;
use crate::domain::unit_of_work::UnitOfWorkFactory;

/// 重置密码处理器
pub struct ResetPasswordHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
}

impl ResetPasswordHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, token_service: Arc<TokenService>) -> Self {
        Self {
            uow_factory,
            token_service,
        }
    }
}

#[async_trait]
impl CommandHandler<ResetPasswordCommand> for ResetPasswordHandler {
    async fn handle(&self, command: ResetPasswordCommand) -> AppResult<()> {
        // 签名、过期、令牌种类都在这里校验
        let claims = self.token_service.verify_password_reset_token(&command.token)?;

        let password_hash = PasswordService::hash_password(&command.new_password)?;

        let uow = self.uow_factory.begin().await?;

        match uow.users().find_by_email_ci(&claims.sub).await? {
            Some(mut user) => {
                user.update_password(password_hash);
                uow.users().update(&user).await?;
                uow.commit().await?;

                info!(user_id = %user.id, "Password reset completed");
            }
            None => {
                // 令牌有效但用户已不存在：静默成功，只留告警
                uow.rollback().await?;
                warn!(email = %claims.sub, "Password reset for a token whose user no longer exists");
            }
        }

        Ok(())
    }
}
