//! SMS 适配器
//!
//! 通过短信网关的 REST API 发送短信（Twilio 风格的表单接口）。

mod client;

pub use client::SmsClient;
pub use mall_config::SmsConfig;

use mall_errors::AppResult;

/// 短信发送接口
#[async_trait::async_trait]
pub trait SmsSender: Send + Sync {
    /// 发送一条短信
    async fn send(&self, to: &str, text: &str) -> AppResult<()>;
}
