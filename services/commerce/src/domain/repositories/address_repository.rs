//! 收货地址 Repository trait

use async_trait::async_trait;
use mall_common::UserId;
use mall_errors::AppResult;

use crate::domain::user::Address;

#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// 按登记顺序返回用户的全部地址
    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Vec<Address>>;

    /// 保存新地址
    async fn save(&self, address: &Address) -> AppResult<()>;
}
