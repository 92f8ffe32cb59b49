//! OTP 存储基础设施

mod in_memory_otp_store;

pub use in_memory_otp_store::InMemoryOtpStore;
