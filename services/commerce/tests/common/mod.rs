#![allow(dead_code)]

//! 集成测试公共设施
//!
//! 内存版 UnitOfWork：begin 时拷贝已提交状态作为工作副本，
//! commit 写回，rollback 丢弃。事务锁串行化并发的 UnitOfWork，
//! 模拟数据库对同一行的写锁。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use secrecy::Secret;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use mall_adapter_email::EmailSender;
use mall_adapter_sms::SmsSender;
use mall_auth_core::TokenService;
use mall_common::{ProductId, UserId};
use mall_config::{JwtConfig, VerificationConfig};
use mall_errors::{AppError, AppResult};

use mall_commerce::domain::catalog::Product;
use mall_commerce::domain::order::Order;
use mall_commerce::domain::repositories::{
    AddressRepository, InventoryRepository, OrderRepository, ProductRepository, UserRepository,
    VerificationTokenRepository,
};
use mall_commerce::domain::services::PasswordService;
use mall_commerce::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use mall_commerce::domain::user::{Address, User, VerificationToken};
use mall_commerce::domain::value_objects::{Email, PhoneNumber, Username};

// =============================================================================
// 内存存储
// =============================================================================

#[derive(Default, Clone)]
pub struct StoreData {
    pub users: Vec<User>,
    pub tokens: Vec<VerificationToken>,
    pub addresses: Vec<Address>,
    pub products: Vec<Product>,
    pub inventory: HashMap<Uuid, i64>,
    pub orders: Vec<Order>,
}

pub struct InMemoryStore {
    committed: Arc<StdMutex<StoreData>>,
    tx_lock: Arc<AsyncMutex<()>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            committed: Arc::new(StdMutex::new(StoreData::default())),
            tx_lock: Arc::new(AsyncMutex::new(())),
        })
    }

    /// 已提交状态的快照（断言用）
    pub fn snapshot(&self) -> StoreData {
        self.committed.lock().unwrap().clone()
    }

    pub fn seed_user(&self, user: User) {
        self.committed.lock().unwrap().users.push(user);
    }

    pub fn seed_token(&self, token: VerificationToken) {
        self.committed.lock().unwrap().tokens.push(token);
    }

    pub fn seed_address(&self, address: Address) {
        self.committed.lock().unwrap().addresses.push(address);
    }

    pub fn seed_product(&self, product: Product, quantity: i64) {
        let mut data = self.committed.lock().unwrap();
        data.inventory.insert(product.id.0, quantity);
        data.products.push(product);
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.committed
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username.as_str().eq_ignore_ascii_case(username))
            .cloned()
    }

    pub fn tokens_for(&self, user_id: &UserId) -> Vec<VerificationToken> {
        self.committed
            .lock()
            .unwrap()
            .tokens
            .iter()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect()
    }

    pub fn quantity_of(&self, product_id: &ProductId) -> Option<i64> {
        self.committed
            .lock()
            .unwrap()
            .inventory
            .get(&product_id.0)
            .copied()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.committed.lock().unwrap().orders.clone()
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = self.tx_lock.clone().lock_owned().await;
        let working = Arc::new(StdMutex::new(self.committed.lock().unwrap().clone()));

        Ok(Box::new(InMemoryUnitOfWork {
            committed: self.committed.clone(),
            user_repo: InMemUserRepository(working.clone()),
            token_repo: InMemVerificationTokenRepository(working.clone()),
            address_repo: InMemAddressRepository(working.clone()),
            product_repo: InMemProductRepository(working.clone()),
            inventory_repo: InMemInventoryRepository(working.clone()),
            order_repo: InMemOrderRepository(working.clone()),
            working,
            _guard: guard,
        }))
    }
}

pub struct InMemoryUnitOfWork {
    committed: Arc<StdMutex<StoreData>>,
    working: Arc<StdMutex<StoreData>>,
    user_repo: InMemUserRepository,
    token_repo: InMemVerificationTokenRepository,
    address_repo: InMemAddressRepository,
    product_repo: InMemProductRepository,
    inventory_repo: InMemInventoryRepository,
    order_repo: InMemOrderRepository,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.user_repo
    }

    fn verification_tokens(&self) -> &dyn VerificationTokenRepository {
        &self.token_repo
    }

    fn addresses(&self) -> &dyn AddressRepository {
        &self.address_repo
    }

    fn products(&self) -> &dyn ProductRepository {
        &self.product_repo
    }

    fn inventory(&self) -> &dyn InventoryRepository {
        &self.inventory_repo
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.order_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let working = self.working.lock().unwrap().clone();
        *self.committed.lock().unwrap() = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

// =============================================================================
// 内存 Repository 实现
// =============================================================================

pub struct InMemUserRepository(Arc<StdMutex<StoreData>>);

#[async_trait]
impl UserRepository for InMemUserRepository {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == *id)
            .cloned())
    }

    async fn find_by_username_ci(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username.as_str().eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email_ci(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email.as_str().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        self.0.lock().unwrap().users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut data = self.0.lock().unwrap();
        let existing = data
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::internal("Update of unknown user"))?;
        *existing = user.clone();
        Ok(())
    }
}

pub struct InMemVerificationTokenRepository(Arc<StdMutex<StoreData>>);

#[async_trait]
impl VerificationTokenRepository for InMemVerificationTokenRepository {
    async fn save(&self, token: &VerificationToken) -> AppResult<()> {
        self.0.lock().unwrap().tokens.push(token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<VerificationToken>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .tokens
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn find_latest_by_user(&self, user_id: &UserId) -> AppResult<Option<VerificationToken>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .tokens
            .iter()
            .filter(|t| t.user_id == *user_id)
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn delete_by_user(&self, user_id: &UserId) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .tokens
            .retain(|t| t.user_id != *user_id);
        Ok(())
    }
}

pub struct InMemAddressRepository(Arc<StdMutex<StoreData>>);

#[async_trait]
impl AddressRepository for InMemAddressRepository {
    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Vec<Address>> {
        // 插入顺序即登记顺序
        Ok(self
            .0
            .lock()
            .unwrap()
            .addresses
            .iter()
            .filter(|a| a.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn save(&self, address: &Address) -> AppResult<()> {
        self.0.lock().unwrap().addresses.push(address.clone());
        Ok(())
    }
}

pub struct InMemProductRepository(Arc<StdMutex<StoreData>>);

#[async_trait]
impl ProductRepository for InMemProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|p| p.id == *id)
            .cloned())
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        self.0.lock().unwrap().products.push(product.clone());
        Ok(())
    }
}

pub struct InMemInventoryRepository(Arc<StdMutex<StoreData>>);

#[async_trait]
impl InventoryRepository for InMemInventoryRepository {
    async fn quantity_of(&self, product_id: &ProductId) -> AppResult<Option<i64>> {
        Ok(self.0.lock().unwrap().inventory.get(&product_id.0).copied())
    }

    async fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .inventory
            .insert(product_id.0, quantity);
        Ok(())
    }

    async fn decrement(&self, product_id: &ProductId, quantity: i64) -> AppResult<bool> {
        let mut data = self.0.lock().unwrap();
        match data.inventory.get_mut(&product_id.0) {
            Some(available) if *available >= quantity => {
                *available -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub struct InMemOrderRepository(Arc<StdMutex<StoreData>>);

#[async_trait]
impl OrderRepository for InMemOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        self.0.lock().unwrap().orders.push(order.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .0
            .lock()
            .unwrap()
            .orders
            .iter()
            .filter(|o| o.user_id == *user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        Ok(orders)
    }
}

// =============================================================================
// 记录型外部适配器
// =============================================================================

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub context: serde_json::Value,
}

#[derive(Default)]
pub struct RecordingEmailSender {
    sent: StdMutex<Vec<SentEmail>>,
    failing: AtomicBool,
}

impl RecordingEmailSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, to: &str, subject: &str, template: &str, context: serde_json::Value) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::delivery_failure("SMTP gateway unavailable"));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            template: template.to_string(),
            context,
        });
        Ok(())
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_text_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.record(to, subject, "", serde_json::json!({ "body": body }))
    }

    async fn send_html_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        _text_body: Option<&str>,
    ) -> AppResult<()> {
        self.record(to, subject, "", serde_json::json!({ "body": html_body }))
    }

    async fn send_template_email(
        &self,
        to: &str,
        subject: &str,
        template_name: &str,
        context: &serde_json::Value,
    ) -> AppResult<()> {
        self.record(to, subject, template_name, context.clone())
    }
}

#[derive(Default)]
pub struct RecordingSmsSender {
    sent: StdMutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingSmsSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// (收件号码, 短信正文) 列表
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// 最后一条短信里的 6 位验证码
    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, text)| {
            text.chars()
                .filter(|c| c.is_ascii_digit())
                .collect::<String>()
        })
    }
}

#[async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(&self, to: &str, text: &str) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::delivery_failure("SMS gateway unavailable"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), text.to_string()));
        Ok(())
    }
}

// =============================================================================
// 构造助手
// =============================================================================

pub fn test_token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        "test-secret",
        "mall".to_string(),
        3600,
        24 * 3600,
        30 * 60,
    ))
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: Secret::new("test-secret".to_string()),
        issuer: "mall".to_string(),
        session_expires_in: 3600,
        verification_expires_hours: 24,
        reset_expires_minutes: 30,
    }
}

pub fn test_verification_config() -> VerificationConfig {
    VerificationConfig {
        base_url: "http://localhost:8080".to_string(),
        resend_interval_minutes: 60,
        otp_ttl_secs: 300,
    }
}

/// 直接构造一个用户（绕过注册流程的测试用）
pub fn make_user(username: &str, email: &str, password: &str, phone: Option<&str>) -> User {
    User::new(
        Username::new(username).unwrap(),
        Email::new(email).unwrap(),
        PasswordService::hash_password(password).unwrap(),
        "Test".to_string(),
        "User".to_string(),
        phone.map(|p| PhoneNumber::new(p).unwrap()),
    )
}
