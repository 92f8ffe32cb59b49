//! mall-config - 配置加载库
//!
//! 合并顺序：config/default.toml → config/{APP_ENV}.toml → 环境变量。

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

/// JWT 配置
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub issuer: String,
    /// 会话令牌有效期（秒）
    #[serde(default = "default_session_expires_in")]
    pub session_expires_in: i64,
    /// 邮箱验证令牌有效期（小时）
    #[serde(default = "default_verification_expires_hours")]
    pub verification_expires_hours: i64,
    /// 密码重置令牌有效期（分钟）
    #[serde(default = "default_reset_expires_minutes")]
    pub reset_expires_minutes: i64,
}

fn default_session_expires_in() -> i64 {
    3600
}

fn default_verification_expires_hours() -> i64 {
    24
}

fn default_reset_expires_minutes() -> i64 {
    30
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 邮件配置
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub from_email: String,
    pub from_name: String,
    #[serde(default)]
    pub use_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 邮件模板目录
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_template_dir() -> String {
    "templates/email".to_string()
}

/// 短信配置
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub api_url: String,
    pub account_sid: String,
    pub auth_token: Secret<String>,
    pub from_number: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// 账户验证流程配置
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// 验证/重置链接的前缀地址
    pub base_url: String,
    /// 验证邮件重发抑制窗口（分钟）
    #[serde(default = "default_resend_interval_minutes")]
    pub resend_interval_minutes: i64,
    /// OTP 有效期（秒）
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: u64,
}

fn default_resend_interval_minutes() -> i64 {
    60
}

fn default_otp_ttl_secs() -> u64 {
    300
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub email: EmailConfig,
    pub sms: SmsConfig,
    pub verification: VerificationConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("").split("_"))
            .extract()?;

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

#[cfg(test)]
mod tests;
