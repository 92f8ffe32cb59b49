//! Repository trait 定义

mod address_repository;
mod inventory_repository;
mod order_repository;
mod product_repository;
mod user_repository;
mod verification_token_repository;

pub use address_repository::AddressRepository;
pub use inventory_repository::InventoryRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;
pub use verification_token_repository::VerificationTokenRepository;
