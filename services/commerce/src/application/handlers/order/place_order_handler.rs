//! 下单处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_cqrs_core::CommandHandler;
use mall_domain_core::Quantity;
use mall_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::application::commands::order::PlaceOrderCommand;
use crate::domain::order::Order;
use crate::domain::unit_of_work::UnitOfWorkFactory;

/// 下单处理器
///
/// 整单原子性：任何一行库存不足就回滚整个事务，已扣减的行
/// 全部还原，订单一行都不落库。
pub struct PlaceOrderHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl PlaceOrderHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl CommandHandler<PlaceOrderCommand> for PlaceOrderHandler {
    async fn handle(&self, command: PlaceOrderCommand) -> AppResult<Order> {
        if command.lines.is_empty() {
            return Err(AppError::validation("Order must contain at least one line"));
        }

        let uow = self.uow_factory.begin().await?;

        // 前置条件 1：用户存在且有已验证的联系手机
        let user = uow
            .users()
            .find_by_id(&command.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !user.has_verified_contact() {
            uow.rollback().await?;
            return Err(AppError::not_found(format!(
                "No verified contact for user {}",
                user.id
            )));
        }

        // 前置条件 2：至少一个收货地址；第一个（登记顺序）做快照
        let mut addresses = uow.addresses().find_by_user(&user.id).await?;
        if addresses.is_empty() {
            uow.rollback().await?;
            return Err(AppError::not_found(format!(
                "No shipping address for user {}",
                user.id
            )));
        }
        let ship_to = addresses.remove(0);

        let mut order = Order::new(user.id, ship_to.into());

        // 逐行按调用方顺序处理：先扣库存，成功才追加订单行
        for line in &command.lines {
            let quantity = Quantity::new(line.quantity)
                .map_err(|e| AppError::validation(e.to_string()))?;

            let product = uow
                .products()
                .find_by_id(&line.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", line.product_id))
                })?;

            // 条件扣减：检查与扣减在行锁下原子完成
            let decremented = uow
                .inventory()
                .decrement(&line.product_id, quantity.value())
                .await?;

            if !decremented {
                uow.rollback().await?;
                warn!(
                    user_id = %user.id,
                    product_id = %line.product_id,
                    requested = quantity.value(),
                    "Order aborted: insufficient inventory"
                );
                return Err(AppError::insufficient_inventory(line.product_id.0));
            }

            order.add_line(line.product_id, quantity, product.price);
        }

        // 全部成功，整单落库一次
        uow.orders().save(&order).await?;
        uow.commit().await?;

        metrics::counter!("mall_orders_placed_total").increment(1);
        info!(
            order_id = %order.id,
            user_id = %user.id,
            lines = order.lines.len(),
            "Order placed"
        );

        Ok(order)
    }
}
