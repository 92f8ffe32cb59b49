//! 商品 Repository trait

use async_trait::async_trait;
use mall_common::ProductId;
use mall_errors::AppResult;

use crate::domain::catalog::Product;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 根据 ID 查找商品
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>>;

    /// 保存新商品
    async fn save(&self, product: &Product) -> AppResult<()>;
}
