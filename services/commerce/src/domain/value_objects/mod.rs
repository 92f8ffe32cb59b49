//! 领域值对象

mod email;
mod password;
mod phone;
mod username;

pub use email::{Email, EmailError};
pub use password::{HashedPassword, Password, PasswordError};
pub use phone::{PhoneNumber, PhoneNumberError};
pub use username::{Username, UsernameError};
