//! 应用层

pub mod commands;
pub mod handlers;
