//! 订单 Repository trait

use async_trait::async_trait;
use mall_common::UserId;
use mall_errors::AppResult;

use crate::domain::order::Order;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 保存订单及其全部订单行
    async fn save(&self, order: &Order) -> AppResult<()>;

    /// 用户的全部订单（新的在前）
    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Vec<Order>>;
}
