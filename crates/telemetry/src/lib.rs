//! telemetry - 可观测性库

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化 tracing（输出到 stderr，避免干扰表格输出）
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// 按配置选择输出格式
pub fn init(log_level: &str, json: bool) {
    if json {
        init_tracing_json(log_level);
    } else {
        init_tracing(log_level);
    }
    tracing::debug!(log_level, json, "Tracing initialized");
}

/// 创建未安装的 Prometheus 记录器
pub fn metrics_recorder() -> PrometheusRecorder {
    PrometheusBuilder::new().build_recorder()
}

/// 安装全局 Prometheus 记录器，返回用于渲染快照的句柄
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::debug!("Metrics recorder installed");
    Ok(handle)
}
