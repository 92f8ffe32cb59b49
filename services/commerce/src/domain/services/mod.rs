//! 领域服务

mod otp;
mod password_service;

pub use otp::{OtpDelivery, OtpService, OtpStore};
pub use password_service::PasswordService;
