//! 认证相关处理器

mod forgot_password_handler;
mod login_handler;
mod register_handler;
mod reset_password_handler;

pub use forgot_password_handler::ForgotPasswordHandler;
pub use login_handler::LoginHandler;
pub use register_handler::RegisterHandler;
pub use reset_password_handler::ResetPasswordHandler;
