//! mall-cqrs-core - CQRS 基础 trait

mod command;
mod query;

pub use command::{Command, CommandHandler};
pub use query::{Query, QueryHandler};
