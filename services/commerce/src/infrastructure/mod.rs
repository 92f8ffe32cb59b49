//! 基础设施层
//!
//! 领域接口的具体实现：PostgreSQL 持久化、进程内 OTP 存储。

pub mod otp;
pub mod persistence;
