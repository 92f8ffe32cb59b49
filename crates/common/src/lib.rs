//! mall-common - 通用类型库
//!
//! 各服务共享的强类型 ID 与审计信息。

mod types;

pub use types::{AddressId, AuditInfo, OrderId, ProductId, UserId, VerificationTokenId};
