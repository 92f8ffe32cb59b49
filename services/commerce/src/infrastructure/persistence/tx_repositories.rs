//! 事务感知的 Repository 实现
//!
//! 这些 Repository 使用共享的 Transaction 而非 PgPool，
//! 同一个 UnitOfWork 下的所有操作落在同一个数据库事务里。

use async_trait::async_trait;
use mall_common::{ProductId, UserId};
use mall_errors::{AppError, AppResult};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::catalog::Product;
use crate::domain::order::Order;
use crate::domain::repositories::{
    AddressRepository, InventoryRepository, OrderRepository, ProductRepository, UserRepository,
    VerificationTokenRepository,
};
use crate::domain::user::{Address, User, VerificationToken};

use super::rows::{AddressRow, OrderLineRow, OrderRow, ProductRow, UserRow, VerificationTokenRow};

/// 共享事务类型
pub(crate) type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// 宏：定义一个简单的 TxRepository 结构体
macro_rules! define_tx_repo {
    ($name:ident) => {
        pub struct $name {
            tx: SharedTx,
        }

        impl $name {
            pub fn new(tx: SharedTx) -> Self {
                Self { tx }
            }
        }
    };
}

define_tx_repo!(TxUserRepository);
define_tx_repo!(TxVerificationTokenRepository);
define_tx_repo!(TxAddressRepository);
define_tx_repo!(TxProductRepository);
define_tx_repo!(TxInventoryRepository);
define_tx_repo!(TxOrderRepository);

// =============================================================================
// UserRepository 实现
// =============================================================================

#[async_trait]
impl UserRepository for TxUserRepository {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to find user: {}", e)))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_username_ci(&self, username: &str) -> AppResult<Option<User>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to find user by username: {}", e)))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email_ci(&self, email: &str) -> AppResult<Option<User>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row =
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&mut **tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to find user by email: {}", e)))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name, phone,
                              email_verified, email_verified_at, phone_verified, phone_verified_at,
                              created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.phone.as_ref().map(|p| p.as_str()))
        .bind(user.email_verified)
        .bind(user.email_verified_at)
        .bind(user.phone_verified)
        .bind(user.phone_verified_at)
        .bind(user.audit_info.created_at)
        .bind(user.audit_info.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to save user: {}", e)))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            UPDATE users
            SET username = $1, email = $2, password_hash = $3, first_name = $4, last_name = $5,
                phone = $6, email_verified = $7, email_verified_at = $8, phone_verified = $9,
                phone_verified_at = $10, updated_at = $11
            WHERE id = $12
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.phone.as_ref().map(|p| p.as_str()))
        .bind(user.email_verified)
        .bind(user.email_verified_at)
        .bind(user.phone_verified)
        .bind(user.phone_verified_at)
        .bind(user.audit_info.updated_at)
        .bind(user.id.0)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update user: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// VerificationTokenRepository 实现
// =============================================================================

#[async_trait]
impl VerificationTokenRepository for TxVerificationTokenRepository {
    async fn save(&self, token: &VerificationToken) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            "INSERT INTO verification_tokens (id, user_id, token, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(token.id.0)
        .bind(token.user_id.0)
        .bind(&token.token)
        .bind(token.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to save verification token: {}", e)))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<VerificationToken>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row = sqlx::query_as::<_, VerificationTokenRow>(
            "SELECT * FROM verification_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to find verification token: {}", e)))?;

        Ok(row.map(VerificationTokenRow::into_token))
    }

    async fn find_latest_by_user(&self, user_id: &UserId) -> AppResult<Option<VerificationToken>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row = sqlx::query_as::<_, VerificationTokenRow>(
            "SELECT * FROM verification_tokens WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id.0)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to find latest verification token: {}", e))
        })?;

        Ok(row.map(VerificationTokenRow::into_token))
    }

    async fn delete_by_user(&self, user_id: &UserId) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query("DELETE FROM verification_tokens WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to delete verification tokens: {}", e))
            })?;

        Ok(())
    }
}

// =============================================================================
// AddressRepository 实现
// =============================================================================

#[async_trait]
impl AddressRepository for TxAddressRepository {
    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Vec<Address>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        // id 为 UUIDv7，按 (created_at, id) 排序即登记顺序
        let rows = sqlx::query_as::<_, AddressRow>(
            "SELECT * FROM addresses WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id.0)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to list addresses: {}", e)))?;

        Ok(rows.into_iter().map(AddressRow::into_address).collect())
    }

    async fn save(&self, address: &Address) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            INSERT INTO addresses (id, user_id, line1, line2, city, country, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(address.id.0)
        .bind(address.user_id.0)
        .bind(&address.line1)
        .bind(&address.line2)
        .bind(&address.city)
        .bind(&address.country)
        .bind(address.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to save address: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// ProductRepository 实现
// =============================================================================

#[async_trait]
impl ProductRepository for TxProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to find product: {}", e)))?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category, price_minor, currency)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price.amount)
        .bind(&product.price.currency.0)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to save product: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// InventoryRepository 实现
// =============================================================================

#[async_trait]
impl InventoryRepository for TxInventoryRepository {
    async fn quantity_of(&self, product_id: &ProductId) -> AppResult<Option<i64>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let quantity = sqlx::query_scalar::<_, i64>(
            "SELECT quantity FROM inventory WHERE product_id = $1",
        )
        .bind(product_id.0)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to read inventory: {}", e)))?;

        Ok(quantity)
    }

    async fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            INSERT INTO inventory (product_id, quantity)
            VALUES ($1, $2)
            ON CONFLICT (product_id) DO UPDATE SET quantity = EXCLUDED.quantity
            "#,
        )
        .bind(product_id.0)
        .bind(quantity)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to set inventory: {}", e)))?;

        Ok(())
    }

    async fn decrement(&self, product_id: &ProductId, quantity: i64) -> AppResult<bool> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        // 检查与扣减在同一条 UPDATE 的行锁下原子完成；
        // 余量不足时零行受影响，什么都没有改。
        let result = sqlx::query(
            "UPDATE inventory SET quantity = quantity - $2 WHERE product_id = $1 AND quantity >= $2",
        )
        .bind(product_id.0)
        .bind(quantity)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to decrement inventory: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// OrderRepository 实现
// =============================================================================

#[async_trait]
impl OrderRepository for TxOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, ship_line1, ship_line2, ship_city, ship_country, ordered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id.0)
        .bind(order.user_id.0)
        .bind(&order.ship_to.line1)
        .bind(&order.ship_to.line2)
        .bind(&order.ship_to.city)
        .bind(&order.ship_to.country)
        .bind(order.ordered_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to save order: {}", e)))?;

        for line in &order.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, product_id, quantity, unit_price_minor, currency)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id.0)
            .bind(line.product_id.0)
            .bind(line.quantity.value())
            .bind(line.unit_price.amount)
            .bind(&line.unit_price.currency.0)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to save order line: {}", e)))?;
        }

        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Vec<Order>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let order_rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY ordered_at DESC",
        )
        .bind(user_id.0)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to list orders: {}", e)))?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for order_row in order_rows {
            let line_rows = sqlx::query_as::<_, OrderLineRow>(
                "SELECT * FROM order_lines WHERE order_id = $1",
            )
            .bind(order_row.id)
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to list order lines: {}", e)))?;

            orders.push(order_row.into_order(line_rows));
        }

        Ok(orders)
    }
}
