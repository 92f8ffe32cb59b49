//! Unit of Work 模式
//!
//! 提供跨多个 Repository 的事务协调能力，确保操作的原子性。

use async_trait::async_trait;
use mall_errors::AppResult;

use crate::domain::repositories::{
    AddressRepository, InventoryRepository, OrderRepository, ProductRepository, UserRepository,
    VerificationTokenRepository,
};

/// Unit of Work trait
///
/// 协调多个 Repository 在同一事务中的操作。
///
/// # 使用示例
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
///
/// // 所有操作在同一事务中
/// uow.users().save(&user).await?;
/// uow.verification_tokens().save(&token).await?;
///
/// // 提交事务
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 获取用户 Repository
    fn users(&self) -> &dyn UserRepository;

    /// 获取邮箱验证令牌 Repository
    fn verification_tokens(&self) -> &dyn VerificationTokenRepository;

    /// 获取收货地址 Repository
    fn addresses(&self) -> &dyn AddressRepository;

    /// 获取商品 Repository
    fn products(&self) -> &dyn ProductRepository;

    /// 获取库存 Repository
    fn inventory(&self) -> &dyn InventoryRepository;

    /// 获取订单 Repository
    fn orders(&self) -> &dyn OrderRepository;

    /// 提交事务
    ///
    /// 成功时所有更改将持久化，失败时自动回滚。
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    ///
    /// 撤销所有未提交的更改。
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂 trait
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
