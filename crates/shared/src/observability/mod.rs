//! 统一可观测性模块
//!
//! 提供 logging 与 metrics 的统一初始化和管理，
//! 服务通过单一入口点配置可观测性，确保一致的指标命名。

pub mod metrics;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 可观测性资源守卫
///
/// 持有 metrics HTTP 服务的生命周期，drop 时停止服务。
pub struct ObservabilityGuard {
    metrics_handle: Option<metrics::MetricsHandle>,
}

impl ObservabilityGuard {
    /// 创建一个空的 Guard（用于测试或禁用可观测性时）
    pub fn empty() -> Self {
        Self {
            metrics_handle: None,
        }
    }

    pub fn metrics(&self) -> Option<&metrics::MetricsHandle> {
        self.metrics_handle.as_ref()
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!("Shutting down observability...");
    }
}

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. Tracing（日志）
/// 2. Metrics（Prometheus 指标，`metrics_enabled = false` 时跳过）
pub async fn init(service_name: &str, config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    tracing::init(config)?;

    info!(
        service = %service_name,
        metrics_enabled = config.metrics_enabled,
        metrics_port = config.metrics_port,
        "Observability initialized"
    );

    if !config.metrics_enabled {
        return Ok(ObservabilityGuard::empty());
    }

    let metrics_handle = metrics::init(service_name, config.metrics_port).await?;

    Ok(ObservabilityGuard {
        metrics_handle: Some(metrics_handle),
    })
}
