//! 短信网关客户端实现

use crate::{SmsConfig, SmsSender};
use mall_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, info};

/// 短信网关客户端
#[derive(Clone)]
pub struct SmsClient {
    client: reqwest::Client,
    config: SmsConfig,
}

impl SmsClient {
    /// 创建新的短信客户端
    pub fn new(config: SmsConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait::async_trait]
impl SmsSender for SmsClient {
    async fn send(&self, to: &str, text: &str) -> AppResult<()> {
        debug!(to = %to, "Sending SMS");

        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", text),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::delivery_failure(format!("SMS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::delivery_failure(format!(
                "SMS gateway returned {}: {}",
                status, message
            )));
        }

        info!(to = %to, "SMS sent successfully");
        Ok(())
    }
}
