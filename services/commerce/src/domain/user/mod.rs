//! 用户聚合

mod address;
mod user;
mod verification_token;

pub use address::Address;
pub use user::User;
pub use verification_token::VerificationToken;
