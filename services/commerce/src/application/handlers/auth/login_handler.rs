//! 登录处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_adapter_email::EmailSender;
use mall_auth_core::TokenService;
use mall_config::VerificationConfig;
use mall_cqrs_core::CommandHandler;
use mall_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::application::commands::auth::{LoginCommand, LoginOutcome};
use crate::domain::services::{OtpService, OtpStore, PasswordService};
use crate::domain::unit_of_work::UnitOfWorkFactory;
use crate::domain::user::{User, VerificationToken};

/// 登录处理器
///
/// 凭证通过后按验证状态分流：邮箱未验证 → 视情况重发验证邮件；
/// 手机未验证 → 重发 OTP；双通道都通过 → 签发会话令牌。
pub struct LoginHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
    otp_store: Arc<dyn OtpStore>,
    otp_service: Arc<OtpService>,
    email_sender: Arc<dyn EmailSender>,
    verification: VerificationConfig,
    verification_expires_hours: i64,
}

impl LoginHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        token_service: Arc<TokenService>,
        otp_store: Arc<dyn OtpStore>,
        otp_service: Arc<OtpService>,
        email_sender: Arc<dyn EmailSender>,
        verification: VerificationConfig,
        verification_expires_hours: i64,
    ) -> Self {
        Self {
            uow_factory,
            token_service,
            otp_store,
            otp_service,
            email_sender,
            verification,
            verification_expires_hours,
        }
    }

    /// 凭证检查：密码匹配或 OTP 匹配（匹配即消费）
    async fn credentials_ok(&self, command: &LoginCommand, user: &User) -> AppResult<bool> {
        if let Some(password) = &command.password {
            if PasswordService::verify_password(password, &user.password_hash)? {
                return Ok(true);
            }
        }

        if let Some(otp) = &command.otp {
            if self
                .otp_store
                .take_if_match(user.username.as_str(), otp)
                .await
            {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[async_trait]
impl CommandHandler<LoginCommand> for LoginHandler {
    async fn handle(&self, command: LoginCommand) -> AppResult<LoginOutcome> {
        let uow = self.uow_factory.begin().await?;

        let user = match uow.users().find_by_username_ci(&command.username).await? {
            Some(user) => user,
            None => {
                uow.rollback().await?;
                warn!(username = %command.username, "Login for unknown username");
                return Ok(LoginOutcome::InvalidCredentials);
            }
        };

        if !self.credentials_ok(&command, &user).await? {
            uow.rollback().await?;
            warn!(user_id = %user.id, "Login with invalid credentials");
            return Ok(LoginOutcome::InvalidCredentials);
        }

        // 邮箱未验证：按重发抑制窗口决定是否重发验证邮件
        if !user.email_verified {
            let latest = uow.verification_tokens().find_latest_by_user(&user.id).await?;
            let should_resend = match latest {
                None => true,
                Some(token) => {
                    token.is_older_than_minutes(self.verification.resend_interval_minutes)
                }
            };

            if should_resend {
                let token = self
                    .token_service
                    .generate_email_verification_token(user.email.as_str())?;
                let verification_token = VerificationToken::new(user.id, token.clone());
                uow.verification_tokens().save(&verification_token).await?;

                let verify_link =
                    format!("{}/verify-email?token={}", self.verification.base_url, token);
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
                        "Failed to resend verification email: {}",
                        e
                    )));
                }
            }

            uow.commit().await?;
            info!(user_id = %user.id, resent = should_resend, "Login blocked: email unverified");
            return Ok(LoginOutcome::NeedsEmailVerification {
                verification_resent: should_resend,
            });
        }

        // 手机未验证：向注册手机重发 OTP（投递失败不阻断结果）
        if !user.phone_verified {
            if let Some(phone) = &user.phone {
                self.otp_service
                    .issue(user.username.as_str(), phone.as_str())
                    .await;
            }

            uow.rollback().await?;
            info!(user_id = %user.id, "Login blocked: phone unverified");
            return Ok(LoginOutcome::NeedsPhoneVerification);
        }

        let token = self
            .token_service
            .generate_session_token(user.username.as_str())?;

        uow.rollback().await?;

        metrics::counter!("mall_logins_total").increment(1);
        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome::Authenticated { token })
    }
}
