//! mall-commerce - 电商后端核心服务
//!
//! 三层结构：
//! - domain: 实体、值对象、Repository trait、UnitOfWork、领域服务
//! - application: 命令/查询与处理器（对外暴露的操作面）
//! - infrastructure: PostgreSQL 持久化、内存 OTP 存储

pub mod application;
pub mod domain;
pub mod infrastructure;
