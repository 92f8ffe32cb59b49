//! 忘记密码处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_adapter_email::EmailSender;
use mall_auth_core::TokenService;
use mall_cqrs_core::CommandHandler;
use mall_errors::{AppError, AppResult};
use tracing::info;

use crate::application::commands::auth::ForgotPasswordCommand;
use crate::domain::unit_of_work::UnitOfWorkFactory;

/// 忘记密码处理器
///
/// 重置令牌是自包含的短时 JWT（嵌入邮箱），不落库。
pub struct ForgotPasswordHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
    email_sender: Arc<dyn EmailSender>,
    base_url: String,
    reset_expires_minutes: i64,
}

impl ForgotPasswordHandler {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        token_service: Arc<TokenService>,
        email_sender: Arc<dyn EmailSender>,
        base_url: String,
        reset_expires_minutes: i64,
    ) -> Self {
        Self {
            uow_factory,
            token_service,
            email_sender,
            base_url,
            reset_expires_minutes,
        }
    }
}

#[async_trait]
impl CommandHandler<ForgotPasswordCommand> for ForgotPasswordHandler {
    async fn handle(&self, command: ForgotPasswordCommand) -> AppResult<()> {
        let uow = self.uow_factory.begin().await?;

        let user = uow
            .users()
            .find_by_email_ci(&command.email.to_lowercase())
            .await?;
        uow.rollback().await?;

        let user = user.ok_or_else(|| {
            AppError::not_found(format!("No account for email '{}'", command.email))
        })?;

        let token = self
            .token_service
            .generate_password_reset_token(user.email.as_str())?;

        let reset_link = format!("{}/reset-password?token={}", self.base_url, token);
        let context = serde_json::json!({
            "user_name": user.first_name,
            "reset_link": reset_link,
            "expires_in_minutes": self.reset_expires_minutes,
        });

        self.email_sender
            .send_template_email(
                user.email.as_str(),
                "Reset your password",
                "password_reset.html",
                &context,
            )
            .await
            .map_err(|e| {
                AppError::delivery_failure(format!("Failed to send password reset email: {}", e))
            })?;

        info!(user_id = %user.id, "Password reset email sent");

        Ok(())
    }
}
