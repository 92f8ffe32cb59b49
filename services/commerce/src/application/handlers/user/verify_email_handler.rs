//! 验证邮箱处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_adapter_email::EmailSender;
use mall_cqrs_core::CommandHandler;
use mall_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::application::commands::user::VerifyEmailCommand;
use crate::domain::unit_of_work::UnitOfWorkFactory;

/// 验证邮箱处理器
///
/// 幂等：未知令牌与已验证用户都返回 false，欢迎邮件只发一次。
pub struct VerifyEmailHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    email_sender: Arc<dyn EmailSender>,
}

impl VerifyEmailHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, email_sender: Arc<dyn EmailSender>) -> Self {
        Self {
            uow_factory,
            email_sender,
        }
    }
}

#[async_trait]
impl CommandHandler<VerifyEmailCommand> for VerifyEmailHandler {
    async fn handle(&self, command: VerifyEmailCommand) -> AppResult<bool> {
        let uow = self.uow_factory.begin().await?;

        let token = match uow.verification_tokens().find_by_token(&command.token).await? {
            Some(token) => token,
            None => {
                uow.rollback().await?;
                return Ok(false);
            }
        };

        let mut user = match uow.users().find_by_id(&token.user_id).await? {
            Some(user) => user,
            None => {
                uow.rollback().await?;
                warn!(token_id = %token.id, "Verification token without a user");
                return Ok(false);
            }
        };

        if user.email_verified {
            uow.rollback().await?;
            return Ok(false);
        }

        user.mark_email_verified();
        uow.users().update(&user).await?;
        uow.verification_tokens().delete_by_user(&user.id).await?;

        let context = serde_json::json!({
            "user_name": user.first_name,
        });

        if let Err(e) = self
            .email_sender
            .send_template_email(user.email.as_str(), "Welcome to mall", "welcome.html", &context)
            .await
        {
            uow.rollback().await?;
            return Err(AppError::delivery_failure(format!(
                "Failed to send welcome email: {}",
                e
            )));
        }

        uow.commit().await?;

        info!(user_id = %user.id, "Email verification completed");

        Ok(true)
    }
}
