//! 注册 → 验证 → 登录全流程测试

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use mall_cqrs_core::{CommandHandler, QueryHandler};
use mall_errors::AppError;

use mall_commerce::application::commands::auth::{
    ForgotPasswordCommand, LoginCommand, LoginOutcome, RegisterCommand, ResetPasswordCommand,
};
use mall_commerce::application::commands::user::{
    AddAddressCommand, ListAddressesQuery, OtpValidation, SendOtpCommand, UpdateContactCommand,
    ValidateOtpCommand, VerifyEmailCommand,
};
use mall_commerce::application::handlers::{
    AddAddressHandler, ForgotPasswordHandler, ListAddressesHandler, LoginHandler, RegisterHandler,
    ResetPasswordHandler, SendOtpHandler, UpdateContactHandler, ValidateOtpHandler,
    VerifyEmailHandler,
};
use mall_commerce::domain::services::{OtpDelivery, OtpService, OtpStore, PasswordService};
use mall_commerce::domain::user::VerificationToken;
use mall_commerce::infrastructure::otp::InMemoryOtpStore;

use common::{
    InMemoryStore, RecordingEmailSender, RecordingSmsSender, make_user, test_token_service,
    test_verification_config,
};

/// 一套完整的身份处理器和它们依赖的假外设
struct Fixture {
    store: Arc<InMemoryStore>,
    email: Arc<RecordingEmailSender>,
    sms: Arc<RecordingSmsSender>,
    register: RegisterHandler,
    login: LoginHandler,
    verify_email: VerifyEmailHandler,
    send_otp: SendOtpHandler,
    validate_otp: ValidateOtpHandler,
    forgot_password: ForgotPasswordHandler,
    reset_password: ResetPasswordHandler,
    update_contact: UpdateContactHandler,
    add_address: AddAddressHandler,
    list_addresses: ListAddressesHandler,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let email = RecordingEmailSender::new();
        let sms = RecordingSmsSender::new();
        let token_service = test_token_service();
        let verification = test_verification_config();

        let otp_store: Arc<dyn OtpStore> = Arc::new(InMemoryOtpStore::new(300));
        let otp_service = Arc::new(OtpService::new(otp_store.clone(), sms.clone()));

        Self {
            register: RegisterHandler::new(
                store.clone(),
                token_service.clone(),
                email.clone(),
                verification.clone(),
                24,
            ),
            login: LoginHandler::new(
                store.clone(),
                token_service.clone(),
                otp_store.clone(),
                otp_service.clone(),
                email.clone(),
                verification.clone(),
                24,
            ),
            verify_email: VerifyEmailHandler::new(store.clone(), email.clone()),
            send_otp: SendOtpHandler::new(store.clone(), otp_service),
            validate_otp: ValidateOtpHandler::new(store.clone(), otp_store),
            forgot_password: ForgotPasswordHandler::new(
                store.clone(),
                token_service.clone(),
                email.clone(),
                verification.base_url.clone(),
                30,
            ),
            reset_password: ResetPasswordHandler::new(store.clone(), token_service),
            update_contact: UpdateContactHandler::new(store.clone()),
            add_address: AddAddressHandler::new(store.clone()),
            list_addresses: ListAddressesHandler::new(store.clone()),
            store,
            email,
            sms,
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1pass".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Doe".to_string(),
            phone: Some("+1 5551234567".to_string()),
        }
    }
}

#[tokio::test]
async fn test_registration_leaves_unverified_user_with_token_and_email() {
    let fx = Fixture::new();

    let user = fx.register.handle(Fixture::register_command()).await.unwrap();

    assert!(!user.email_verified);
    assert!(!user.phone_verified);

    let stored = fx.store.user_by_username("alice").unwrap();
    assert_eq!(stored.id, user.id);

    let tokens = fx.store.tokens_for(&user.id);
    assert_eq!(tokens.len(), 1);

    // 验证邮件带着同一个令牌
    let sent = fx.email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].template, "verification.html");
    let link = sent[0].context["verify_link"].as_str().unwrap();
    assert!(link.contains(&tokens[0].token));
}

#[tokio::test]
async fn test_duplicate_registration_is_case_insensitive() {
    let fx = Fixture::new();
    fx.register.handle(Fixture::register_command()).await.unwrap();

    let mut dup = Fixture::register_command();
    dup.username = "ALICE".to_string();
    dup.email = "other@example.com".to_string();
    let err = fx.register.handle(dup).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));

    let mut dup = Fixture::register_command();
    dup.username = "someoneelse".to_string();
    dup.email = "ALICE@EXAMPLE.COM".to_string();
    let err = fx.register.handle(dup).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_registration_rolls_back_when_email_fails() {
    let fx = Fixture::new();
    fx.email.set_failing(true);

    let err = fx.register.handle(Fixture::register_command()).await.unwrap_err();
    assert!(matches!(err, AppError::DeliveryFailure(_)));

    // 没有用户也没有令牌留下
    assert!(fx.store.user_by_username("alice").is_none());
    assert!(fx.store.snapshot().tokens.is_empty());
}

#[tokio::test]
async fn test_no_session_token_until_both_channels_verified() {
    let fx = Fixture::new();
    let user = fx.register.handle(Fixture::register_command()).await.unwrap();

    let login = LoginCommand {
        username: "alice".to_string(),
        password: Some("secret1pass".to_string()),
        otp: None,
    };

    // 邮箱未验证：刚注册过，不重发
    let outcome = fx.login.handle(login.clone()).await.unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::NeedsEmailVerification {
            verification_resent: false
        }
    );

    // 验证邮箱后：手机仍未验证，触发 OTP 重发
    let token = fx.store.tokens_for(&user.id)[0].token.clone();
    assert!(fx.verify_email.handle(VerifyEmailCommand { token }).await.unwrap());

    let outcome = fx.login.handle(login.clone()).await.unwrap();
    assert_eq!(outcome, LoginOutcome::NeedsPhoneVerification);
    assert_eq!(fx.sms.sent().len(), 1);

    // OTP 验证通过后才拿到会话令牌
    let code = fx.sms.last_code().unwrap();
    let validation = fx
        .validate_otp
        .handle(ValidateOtpCommand {
            username: "alice".to_string(),
            code,
        })
        .await
        .unwrap();
    assert_eq!(validation, OtpValidation::Valid);

    let outcome = fx.login.handle(login).await.unwrap();
    assert!(matches!(outcome, LoginOutcome::Authenticated { .. }));
}

#[tokio::test]
async fn test_login_with_wrong_credentials() {
    let fx = Fixture::new();
    fx.register.handle(Fixture::register_command()).await.unwrap();

    let outcome = fx
        .login
        .handle(LoginCommand {
            username: "alice".to_string(),
            password: Some("wrong1pass".to_string()),
            otp: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome, LoginOutcome::InvalidCredentials);

    let outcome = fx
        .login
        .handle(LoginCommand {
            username: "nobody".to_string(),
            password: Some("secret1pass".to_string()),
            otp: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome, LoginOutcome::InvalidCredentials);
}

#[tokio::test]
async fn test_login_resends_verification_only_outside_window() {
    let fx = Fixture::new();

    // 用户未验证邮箱，最新令牌已超过重发窗口
    let user = make_user("bob", "bob@example.com", "secret1pass", None);
    let mut stale = VerificationToken::new(user.id, "stale-token".to_string());
    stale.created_at = Utc::now() - Duration::minutes(61);
    fx.store.seed_user(user.clone());
    fx.store.seed_token(stale);

    let outcome = fx
        .login
        .handle(LoginCommand {
            username: "bob".to_string(),
            password: Some("secret1pass".to_string()),
            otp: None,
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        LoginOutcome::NeedsEmailVerification {
            verification_resent: true
        }
    );
    assert_eq!(fx.store.tokens_for(&user.id).len(), 2);
    assert_eq!(fx.email.sent().len(), 1);

    // 刚重发过：再次登录不再发
    let outcome = fx
        .login
        .handle(LoginCommand {
            username: "bob".to_string(),
            password: Some("secret1pass".to_string()),
            otp: None,
        })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::NeedsEmailVerification {
            verification_resent: false
        }
    );
    assert_eq!(fx.email.sent().len(), 1);
}

#[tokio::test]
async fn test_verify_email_is_one_shot() {
    let fx = Fixture::new();
    let user = fx.register.handle(Fixture::register_command()).await.unwrap();
    let token = fx.store.tokens_for(&user.id)[0].token.clone();

    assert!(fx
        .verify_email
        .handle(VerifyEmailCommand { token: token.clone() })
        .await
        .unwrap());

    let stored = fx.store.user_by_username("alice").unwrap();
    assert!(stored.email_verified);
    assert!(fx.store.tokens_for(&user.id).is_empty());

    // 同一令牌第二次无效，欢迎邮件只有一封
    assert!(!fx.verify_email.handle(VerifyEmailCommand { token }).await.unwrap());
    let welcome_count = fx
        .email
        .sent()
        .iter()
        .filter(|e| e.template == "welcome.html")
        .count();
    assert_eq!(welcome_count, 1);
}

#[tokio::test]
async fn test_verify_email_with_unknown_token() {
    let fx = Fixture::new();

    let verified = fx
        .verify_email
        .handle(VerifyEmailCommand {
            token: "no-such-token".to_string(),
        })
        .await
        .unwrap();
    assert!(!verified);
}

#[tokio::test]
async fn test_otp_round_trip_and_replay() {
    let fx = Fixture::new();
    let user = make_user("carol", "carol@example.com", "secret1pass", Some("+1 5559876543"));
    fx.store.seed_user(user);

    let delivery = fx
        .send_otp
        .handle(SendOtpCommand {
            username: "carol".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(delivery, OtpDelivery::Delivered);

    let code = fx.sms.last_code().unwrap();
    let wrong = if code == "999999" { "111111" } else { "999999" };

    // 错误验证码不消费也不改状态
    let validation = fx
        .validate_otp
        .handle(ValidateOtpCommand {
            username: "carol".to_string(),
            code: wrong.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(validation, OtpValidation::Invalid);
    assert!(!fx.store.user_by_username("carol").unwrap().phone_verified);

    // 正确验证码：设置 phone_verified，且只能用一次
    let validation = fx
        .validate_otp
        .handle(ValidateOtpCommand {
            username: "carol".to_string(),
            code: code.clone(),
        })
        .await
        .unwrap();
    assert_eq!(validation, OtpValidation::Valid);
    assert!(fx.store.user_by_username("carol").unwrap().phone_verified);

    let replay = fx
        .validate_otp
        .handle(ValidateOtpCommand {
            username: "carol".to_string(),
            code,
        })
        .await
        .unwrap();
    assert_eq!(replay, OtpValidation::Invalid);
}

#[tokio::test]
async fn test_send_otp_failures_are_results_not_errors() {
    let fx = Fixture::new();
    let no_phone = make_user("dave", "dave@example.com", "secret1pass", None);
    fx.store.seed_user(no_phone);

    let delivery = fx
        .send_otp
        .handle(SendOtpCommand {
            username: "nobody".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(delivery, OtpDelivery::Failed { .. }));

    let delivery = fx
        .send_otp
        .handle(SendOtpCommand {
            username: "dave".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(delivery, OtpDelivery::Failed { .. }));

    // 短信网关故障同样不是 Err，验证码仍然已经存好
    let with_phone = make_user("erin", "erin@example.com", "secret1pass", Some("+1 5550001111"));
    fx.store.seed_user(with_phone);
    fx.sms.set_failing(true);

    let delivery = fx
        .send_otp
        .handle(SendOtpCommand {
            username: "erin".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(delivery, OtpDelivery::Failed { .. }));
}

#[tokio::test]
async fn test_update_contact_requires_ownership() {
    let fx = Fixture::new();
    let alice = make_user("alice", "alice@example.com", "secret1pass", Some("+1 5551234567"));
    let mallory = make_user("mallory", "mallory@example.com", "secret1pass", None);
    fx.store.seed_user(alice.clone());
    fx.store.seed_user(mallory.clone());

    let err = fx
        .update_contact
        .handle(UpdateContactCommand {
            actor_id: mallory.id,
            user_id: alice.id,
            phone: "+1 5550009999".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // 本人更换号码：成功且清除手机验证状态
    fx.store.seed_user(make_user("frank", "frank@example.com", "secret1pass", Some("+1 5552223333")));
    let frank = fx.store.user_by_username("frank").unwrap();

    fx.update_contact
        .handle(UpdateContactCommand {
            actor_id: frank.id,
            user_id: frank.id,
            phone: "+44 7700900123".to_string(),
        })
        .await
        .unwrap();

    let updated = fx.store.user_by_username("frank").unwrap();
    assert_eq!(updated.phone.unwrap().as_str(), "+44 7700900123");
    assert!(!updated.phone_verified);
}

#[tokio::test]
async fn test_address_ownership_guard() {
    let fx = Fixture::new();
    let alice = make_user("alice", "alice@example.com", "secret1pass", None);
    let mallory = make_user("mallory", "mallory@example.com", "secret1pass", None);
    fx.store.seed_user(alice.clone());
    fx.store.seed_user(mallory.clone());

    let err = fx
        .add_address
        .handle(AddAddressCommand {
            actor_id: mallory.id,
            user_id: alice.id,
            line1: "1 Evil St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            country: "US".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = fx
        .list_addresses
        .handle(ListAddressesQuery {
            actor_id: mallory.id,
            user_id: alice.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // 本人操作正常
    fx.add_address
        .handle(AddAddressCommand {
            actor_id: alice.id,
            user_id: alice.id,
            line1: "1 Main St".to_string(),
            line2: Some("Apt 2".to_string()),
            city: "Springfield".to_string(),
            country: "US".to_string(),
        })
        .await
        .unwrap();

    let addresses = fx
        .list_addresses
        .handle(ListAddressesQuery {
            actor_id: alice.id,
            user_id: alice.id,
        })
        .await
        .unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].line1, "1 Main St");
}

#[tokio::test]
async fn test_forgot_and_reset_password_flow() {
    let fx = Fixture::new();
    let user = make_user("alice", "alice@example.com", "oldpass1", None);
    fx.store.seed_user(user);

    fx.forgot_password
        .handle(ForgotPasswordCommand {
            email: "Alice@Example.com".to_string(),
        })
        .await
        .unwrap();

    let sent = fx.email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template, "password_reset.html");
    let reset_link = sent[0].context["reset_link"].as_str().unwrap();
    let token = reset_link.split("token=").nth(1).unwrap().to_string();

    fx.reset_password
        .handle(ResetPasswordCommand {
            token,
            new_password: "newpass2".to_string(),
        })
        .await
        .unwrap();

    let updated = fx.store.user_by_username("alice").unwrap();
    assert!(PasswordService::verify_password("newpass2", &updated.password_hash).unwrap());
    assert!(!PasswordService::verify_password("oldpass1", &updated.password_hash).unwrap());
}

#[tokio::test]
async fn test_forgot_password_for_unknown_email() {
    let fx = Fixture::new();

    let err = fx
        .forgot_password
        .handle(ForgotPasswordCommand {
            email: "ghost@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(fx.email.sent().is_empty());
}

#[tokio::test]
async fn test_reset_password_rejects_bad_tokens() {
    let fx = Fixture::new();

    let err = fx
        .reset_password
        .handle(ResetPasswordCommand {
            token: "garbage".to_string(),
            new_password: "newpass2".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidToken(_)));

    // 会话令牌不能当重置令牌用
    let session = test_token_service().generate_session_token("alice").unwrap();
    let err = fx
        .reset_password
        .handle(ResetPasswordCommand {
            token: session,
            new_password: "newpass2".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidToken(_)));
}

#[tokio::test]
async fn test_reset_password_for_vanished_user_is_silent() {
    let fx = Fixture::new();

    // 令牌有效但对应用户不存在：静默成功
    let token = test_token_service()
        .generate_password_reset_token("ghost@example.com")
        .unwrap();
    fx.reset_password
        .handle(ResetPasswordCommand {
            token,
            new_password: "newpass2".to_string(),
        })
        .await
        .unwrap();
}
