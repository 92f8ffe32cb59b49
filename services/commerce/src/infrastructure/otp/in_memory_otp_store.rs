//! 进程内 OTP 存储
//!
//! 单实例部署下验证码不需要跨进程共享，用内存表加 TTL 即可。

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::services::OtpStore;

/// 内存 OTP 存储
///
/// 每个用户名最多一条待验证码，重新签发覆盖旧码。
pub struct InMemoryOtpStore {
    entries: Mutex<HashMap<String, OtpEntry>>,
    ttl: Duration,
}

struct OtpEntry {
    code: String,
    issued_at: Instant,
}

impl InMemoryOtpStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, username: &str, code: &str) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            username.to_string(),
            OtpEntry {
                code: code.to_string(),
                issued_at: Instant::now(),
            },
        );
    }

    async fn take_if_match(&self, username: &str, code: &str) -> bool {
        let mut entries = self.entries.lock().await;

        let Some(entry) = entries.get(username) else {
            return false;
        };

        if entry.issued_at.elapsed() >= self.ttl {
            entries.remove(username);
            return false;
        }

        if entry.code != code {
            return false;
        }

        entries.remove(username);
        true
    }
}
