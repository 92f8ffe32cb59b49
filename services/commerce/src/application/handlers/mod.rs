//! 应用层处理器

pub mod auth;
pub mod order;
pub mod user;

use std::sync::Arc;

use mall_adapter_email::EmailSender;
use mall_auth_core::TokenService;
use mall_config::{JwtConfig, VerificationConfig};

use crate::domain::services::{OtpService, OtpStore};
use crate::domain::unit_of_work::UnitOfWorkFactory;

pub use auth::{ForgotPasswordHandler, LoginHandler, RegisterHandler, ResetPasswordHandler};
pub use order::PlaceOrderHandler;
pub use user::{
    AddAddressHandler, ListAddressesHandler, SendOtpHandler, UpdateContactHandler,
    ValidateOtpHandler, VerifyEmailHandler,
};

/// 全部处理器的组装结果
///
/// 处理器就是对外暴露的操作面；传输层（HTTP/gRPC 路由）不在此服务内。
pub struct CommerceHandlers {
    pub register: Arc<RegisterHandler>,
    pub login: Arc<LoginHandler>,
    pub forgot_password: Arc<ForgotPasswordHandler>,
    pub reset_password: Arc<ResetPasswordHandler>,
    pub verify_email: Arc<VerifyEmailHandler>,
    pub send_otp: Arc<SendOtpHandler>,
    pub validate_otp: Arc<ValidateOtpHandler>,
    pub update_contact: Arc<UpdateContactHandler>,
    pub add_address: Arc<AddAddressHandler>,
    pub list_addresses: Arc<ListAddressesHandler>,
    pub place_order: Arc<PlaceOrderHandler>,
}

impl CommerceHandlers {
    pub fn assemble(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        token_service: Arc<TokenService>,
        email_sender: Arc<dyn EmailSender>,
        otp_store: Arc<dyn OtpStore>,
        otp_service: Arc<OtpService>,
        jwt: &JwtConfig,
        verification: &VerificationConfig,
    ) -> Self {
        Self {
            register: Arc::new(RegisterHandler::new(
                uow_factory.clone(),
                token_service.clone(),
                email_sender.clone(),
                verification.clone(),
                jwt.verification_expires_hours,
            )),
            login: Arc::new(LoginHandler::new(
                uow_factory.clone(),
                token_service.clone(),
                otp_store.clone(),
                otp_service.clone(),
                email_sender.clone(),
                verification.clone(),
                jwt.verification_expires_hours,
            )),
            forgot_password: Arc::new(ForgotPasswordHandler::new(
                uow_factory.clone(),
                token_service.clone(),
                email_sender.clone(),
                verification.base_url.clone(),
                jwt.reset_expires_minutes,
            )),
            reset_password: Arc::new(ResetPasswordHandler::new(
                uow_factory.clone(),
                token_service,
            )),
            verify_email: Arc::new(VerifyEmailHandler::new(
                uow_factory.clone(),
                email_sender,
            )),
            send_otp: Arc::new(SendOtpHandler::new(uow_factory.clone(), otp_service)),
            validate_otp: Arc::new(ValidateOtpHandler::new(uow_factory.clone(), otp_store)),
            update_contact: Arc::new(UpdateContactHandler::new(uow_factory.clone())),
            add_address: Arc::new(AddAddressHandler::new(uow_factory.clone())),
            list_addresses: Arc::new(ListAddressesHandler::new(uow_factory.clone())),
            place_order: Arc::new(PlaceOrderHandler::new(uow_factory)),
        }
    }
}
