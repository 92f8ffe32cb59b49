//! mall-auth-core - 令牌核心库
//!
//! 签发与校验三类 HS256 JWT：
//! - 会话令牌（登录成功后签发，sub = 用户名）
//! - 邮箱验证令牌（嵌入邮箱地址，随验证链接发出）
//! - 密码重置令牌（嵌入邮箱地址，短时有效）

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mall_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 令牌种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Session,
    EmailVerification,
    PasswordReset,
}

impl TokenKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::EmailVerification => "email-verification",
            Self::PasswordReset => "password-reset",
        }
    }
}

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject（会话令牌为用户名，验证/重置令牌为邮箱地址）
    pub sub: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Token kind (session / email-verification / password-reset)
    #[serde(default)]
    pub token_type: String,
}

impl Claims {
    fn new(subject: &str, kind: TokenKind, expires_in_secs: i64, issuer: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            token_type: kind.as_str().to_string(),
        }
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    session_expires_in: i64,
    verification_expires_in: i64,
    reset_expires_in: i64,
}

impl TokenService {
    pub fn new(
        secret: &str,
        issuer: String,
        session_expires_in: i64,
        verification_expires_in: i64,
        reset_expires_in: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            session_expires_in,
            verification_expires_in,
            reset_expires_in,
        }
    }

    /// 生成会话令牌
    pub fn generate_session_token(&self, username: &str) -> AppResult<String> {
        self.sign(username, TokenKind::Session, self.session_expires_in)
    }

    /// 生成邮箱验证令牌
    pub fn generate_email_verification_token(&self, email: &str) -> AppResult<String> {
        self.sign(
            email,
            TokenKind::EmailVerification,
            self.verification_expires_in,
        )
    }

    /// 生成密码重置令牌
    pub fn generate_password_reset_token(&self, email: &str) -> AppResult<String> {
        self.sign(email, TokenKind::PasswordReset, self.reset_expires_in)
    }

    /// 校验会话令牌
    pub fn verify_session_token(&self, token: &str) -> AppResult<Claims> {
        self.verify(token, TokenKind::Session)
    }

    /// 校验邮箱验证令牌
    pub fn verify_email_verification_token(&self, token: &str) -> AppResult<Claims> {
        self.verify(token, TokenKind::EmailVerification)
    }

    /// 校验密码重置令牌
    pub fn verify_password_reset_token(&self, token: &str) -> AppResult<Claims> {
        self.verify(token, TokenKind::PasswordReset)
    }

    pub fn session_expires_in(&self) -> i64 {
        self.session_expires_in
    }

    fn sign(&self, subject: &str, kind: TokenKind, expires_in_secs: i64) -> AppResult<String> {
        let claims = Claims::new(subject, kind, expires_in_secs, &self.issuer);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::invalid_token(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        if claims.token_type != kind.as_str() {
            return Err(AppError::invalid_token(format!(
                "Expected a {} token",
                kind.as_str()
            )));
        }

        Ok(claims)
    }
}
