//! 库存 Repository trait

use async_trait::async_trait;
use mall_common::ProductId;
use mall_errors::AppResult;

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// 当前余量
    async fn quantity_of(&self, product_id: &ProductId) -> AppResult<Option<i64>>;

    /// 设置余量（建档/补货）
    async fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> AppResult<()>;

    /// 条件扣减：余量足够则扣减并返回 true，否则不做任何修改返回 false。
    /// 检查与扣减在行锁下原子完成。
    async fn decrement(&self, product_id: &ProductId, quantity: i64) -> AppResult<bool>;
}
