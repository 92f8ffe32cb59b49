//! 收货地址实体

use chrono::{DateTime, Utc};
use mall_common::{AddressId, UserId};
use serde::{Deserialize, Serialize};

/// 收货地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl Address {
    pub fn new(
        user_id: UserId,
        line1: String,
        line2: Option<String>,
        city: String,
        country: String,
    ) -> Self {
        Self {
            id: AddressId::new(),
            user_id,
            line1,
            line2,
            city,
            country,
            created_at: Utc::now(),
        }
    }
}
