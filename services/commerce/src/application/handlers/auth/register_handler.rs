//! 注册处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_adapter_email::EmailSender;
use mall_auth_core::TokenService;
use mall_config::VerificationConfig;
use mall_cqrs_core::CommandHandler;
use mall_errors::{AppError, AppResult};
use tracing::info;

use crate::application::commands::auth::RegisterCommand;
use crate::domain::services::PasswordService;
use crate::domain::unit_of_work::UnitOfWorkFactory;
use crate::domain::user::{User, VerificationToken};
use crate::domain::value_objects::{Email, PhoneNumber, Username};

/// 注册处理器
///
/// 用户行、验证令牌和验证邮件在同一个事务边界内：邮件发不出去
/// 就回滚整个注册，绝不留下一个收不到验证链接的账号。
pub struct RegisterHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
    email_sender: Arc<dyn EmailSender>,
    verification: VerificationConfig,
    verification_expires_hours: i64,
}

impl RegisterHandler {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        token_service: Arc<TokenService>,
        email_sender: Arc<dyn EmailSender>,
        verification: VerificationConfig,
        verification_expires_hours: i64,
    ) -> Self {
        Self {
            uow_factory,
            token_service,
            email_sender,
            verification,
            verification_expires_hours,
        }
    }
}

#[async_trait]
impl CommandHandler<RegisterCommand> for RegisterHandler {
    async fn handle(&self, command: RegisterCommand) -> AppResult<User> {
        let username = Username::new(&command.username)?;
        let email = Email::new(&command.email)?;

        if command.first_name.trim().is_empty() || command.last_name.trim().is_empty() {
            return Err(AppError::validation("First and last name must not be blank"));
        }

        let phone = command
            .phone
            .as_deref()
            .map(PhoneNumber::new)
            .transpose()?;

        let password_hash = PasswordService::hash_password(&command.password)?;

        let uow = self.uow_factory.begin().await?;

        // 用户名与邮箱唯一性（不区分大小写）
        if uow
            .users()
            .find_by_username_ci(username.as_str())
            .await?
            .is_some()
        {
            uow.rollback().await?;
            return Err(AppError::already_exists(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        if uow
            .users()
            .find_by_email_ci(email.as_str())
            .await?
            .is_some()
        {
            uow.rollback().await?;
            return Err(AppError::already_exists(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let user = User::new(
            username,
            email,
            password_hash,
            command.first_name,
            command.last_name,
            phone,
        );

        uow.users().save(&user).await?;

        // 签发验证令牌并随注册邮件发出
        let token = self
            .token_service
            .generate_email_verification_token(user.email.as_str())?;
        let verification_token = VerificationToken::new(user.id, token.clone());
        uow.verification_tokens().save(&verification_token).await?;

        let verify_link = format!("{}/verify-email?token={}", self.verification.base_url, token);
        let context = serde_json::json!({
            "user_name": user.first_name,
            "verify_link": verify_link,
            "expires_in_hours": self.verification_expires_hours,
        });

        if let Err(e) = self
            .email_sender
            .send_template_email(
                user.email.as_str(),
                "Verify your email address",
                "verification.html",
                &context,
            )
            .await
        {
            uow.rollback().await?;
            return Err(AppError::delivery_failure(format!(
                "Failed to send verification email: {}",
                e
            )));
        }

        uow.commit().await?;

        metrics::counter!("mall_users_registered_total").increment(1);
        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }
}
