//! 应用层命令与查询定义

pub mod auth;
pub mod order;
pub mod user;
