//! 一次性验证码（OTP）服务
//!
//! 验证码不落库：注入一个带过期时间的键值存储。比对与删除是
//! 一个原子操作，保证验证码只能被消费一次。

use std::sync::Arc;

use async_trait::async_trait;
use mall_adapter_sms::SmsSender;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// OTP 存储接口
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// 存入验证码，覆盖该用户名已有的待验证码
    async fn put(&self, username: &str, code: &str);

    /// 原子比对并删除：匹配则删除并返回 true，不匹配则保持原样返回 false
    async fn take_if_match(&self, username: &str, code: &str) -> bool;
}

/// OTP 投递结果
///
/// 发送短信失败不是应用错误：验证码已存好，结果里带上失败原因。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpDelivery {
    Delivered,
    Failed { message: String },
}

/// OTP 服务
pub struct OtpService {
    store: Arc<dyn OtpStore>,
    sms_sender: Arc<dyn SmsSender>,
}

impl OtpService {
    pub fn new(store: Arc<dyn OtpStore>, sms_sender: Arc<dyn SmsSender>) -> Self {
        Self { store, sms_sender }
    }

    /// 为用户签发并投递一个验证码
    ///
    /// 验证码在尝试投递之前写入存储，短信失败也不会丢状态。
    /// 此方法从不返回 Err。
    pub async fn issue(&self, username: &str, phone: &str) -> OtpDelivery {
        let code = Self::generate_code();

        self.store.put(username, &code).await;

        let text = format!("Your mall verification code is {}", code);
        match self.sms_sender.send(phone, &text).await {
            Ok(()) => {
                info!(username = %username, "OTP delivered");
                OtpDelivery::Delivered
            }
            Err(e) => {
                warn!(username = %username, error = %e, "OTP delivery failed");
                OtpDelivery::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// 生成 6 位零填充验证码（均匀分布）
    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        format!("{:06}", rng.gen_range(0..1_000_000))
    }
}
