//! 用户自助操作处理器

mod address_handlers;
mod send_otp_handler;
mod update_contact_handler;
mod validate_otp_handler;
mod verify_email_handler;

pub use address_handlers::{AddAddressHandler, ListAddressesHandler};
pub use send_otp_handler::SendOtpHandler;
pub use update_contact_handler::UpdateContactHandler;
pub use validate_otp_handler::ValidateOtpHandler;
pub use verify_email_handler::VerifyEmailHandler;
