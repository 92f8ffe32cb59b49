//! mall-telemetry - 可观测性库
//!
//! tracing 初始化与 Prometheus metrics recorder。

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 开发环境的可读格式
    Pretty,
    /// 生产环境的 JSON 格式
    Json,
}

/// 初始化 tracing
///
/// `RUST_LOG` 环境变量优先于配置中的日志级别。
pub fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// 初始化 Prometheus metrics recorder
///
/// 返回的 handle 可用于由边界层导出 /metrics。
pub fn init_metrics() -> metrics_exporter_prometheus::PrometheusHandle {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}
