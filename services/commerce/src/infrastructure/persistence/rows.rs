//! 数据库行类型与领域对象的转换

use chrono::{DateTime, Utc};
use mall_common::{AddressId, AuditInfo, OrderId, ProductId, UserId, VerificationTokenId};
use mall_domain_core::{Currency, Money, Quantity};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::order::{Order, OrderLine, ShippingAddress};
use crate::domain::user::{Address, User, VerificationToken};
use crate::domain::value_objects::{Email, HashedPassword, PhoneNumber, Username};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email_verified: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub phone_verified: bool,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// 数据库里的值在写入时已通过值对象校验，读取时直接重建
    pub fn into_user(self) -> User {
        User {
            id: UserId::from_uuid(self.id),
            username: Username(self.username),
            email: Email(self.email),
            password_hash: HashedPassword::from_hash(self.password_hash),
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone.map(PhoneNumber),
            email_verified: self.email_verified,
            email_verified_at: self.email_verified_at,
            phone_verified: self.phone_verified,
            phone_verified_at: self.phone_verified_at,
            audit_info: AuditInfo {
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

#[derive(Debug, FromRow)]
pub struct VerificationTokenRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl VerificationTokenRow {
    pub fn into_token(self) -> VerificationToken {
        VerificationToken {
            id: VerificationTokenId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            token: self.token,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct AddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl AddressRow {
    pub fn into_address(self) -> Address {
        Address {
            id: AddressId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            country: self.country,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_minor: i64,
    pub currency: String,
}

impl ProductRow {
    pub fn into_product(self) -> Product {
        Product {
            id: ProductId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            category: self.category,
            price: Money::new(self.price_minor, Currency::new(&self.currency)),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ship_line1: String,
    pub ship_line2: Option<String>,
    pub ship_city: String,
    pub ship_country: String,
    pub ordered_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct OrderLineRow {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price_minor: i64,
    pub currency: String,
}

impl OrderRow {
    pub fn into_order(self, line_rows: Vec<OrderLineRow>) -> Order {
        let lines = line_rows
            .into_iter()
            .map(|row| OrderLine {
                product_id: ProductId::from_uuid(row.product_id),
                // 落库前经过 Quantity::new 校验，必为正数
                quantity: Quantity(row.quantity),
                unit_price: Money::new(row.unit_price_minor, Currency::new(&row.currency)),
            })
            .collect();

        Order {
            id: OrderId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            ship_to: ShippingAddress {
                line1: self.ship_line1,
                line2: self.ship_line2,
                city: self.ship_city,
                country: self.ship_country,
            },
            ordered_at: self.ordered_at,
            lines,
        }
    }
}
