//! Commerce Service - 商城服务入口
//!
//! 组装配置、数据库连接池、外部适配器与全部处理器。
//! 传输层（HTTP/gRPC 路由）由网关侧提供，不在此服务内。

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use mall_adapter_email::{EmailClient, EmailSender, EmailTemplate};
use mall_adapter_sms::{SmsClient, SmsSender};
use mall_auth_core::TokenService;
use mall_commerce::application::handlers::CommerceHandlers;
use mall_commerce::domain::services::{OtpService, OtpStore};
use mall_commerce::domain::unit_of_work::UnitOfWorkFactory;
use mall_commerce::infrastructure::otp::InMemoryOtpStore;
use mall_commerce::infrastructure::persistence::PostgresUnitOfWorkFactory;
use mall_config::AppConfig;
use mall_telemetry::{LogFormat, init_metrics, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;

    let log_format = if config.is_production() {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(&config.telemetry.log_level, log_format);
    let _metrics_handle = init_metrics();

    info!(app_name = %config.app_name, app_env = %config.app_env, "Starting commerce service");

    // 数据库
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(config.database.url.expose_secret())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // 外部适配器
    let template = EmailTemplate::new(&config.email.template_dir)?;
    let email_client = EmailClient::new(config.email.clone()).with_template(template);
    let email_sender: Arc<dyn EmailSender> = Arc::new(email_client);

    let sms_sender: Arc<dyn SmsSender> = Arc::new(SmsClient::new(config.sms.clone())?);

    // 令牌与验证码
    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.issuer.clone(),
        config.jwt.session_expires_in,
        config.jwt.verification_expires_hours * 3600,
        config.jwt.reset_expires_minutes * 60,
    ));

    let otp_store: Arc<dyn OtpStore> =
        Arc::new(InMemoryOtpStore::new(config.verification.otp_ttl_secs));
    let otp_service = Arc::new(OtpService::new(otp_store.clone(), sms_sender));

    // 组装处理器
    let uow_factory: Arc<dyn UnitOfWorkFactory> =
        Arc::new(PostgresUnitOfWorkFactory::new(pool));

    let _handlers = CommerceHandlers::assemble(
        uow_factory,
        token_service,
        email_sender,
        otp_store,
        otp_service,
        &config.jwt,
        &config.verification,
    );

    info!(
        host = %config.server.host,
        port = config.server.port,
        "Commerce service ready"
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
