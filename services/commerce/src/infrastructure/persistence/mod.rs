//! 持久化基础设施

mod postgres_unit_of_work;
mod rows;
mod tx_repositories;

pub use postgres_unit_of_work::PostgresUnitOfWorkFactory;
