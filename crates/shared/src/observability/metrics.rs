//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// 成功处理的消息总数
pub const PROCESSED_MESSAGES_TOTAL: &str = "onms_producer_processed_messages_total";

/// Metrics 资源守卫，drop 时停止 HTTP 服务
pub struct MetricsHandle {
    server_handle: tokio::task::JoinHandle<()>,
    prometheus: PrometheusHandle,
}

impl MetricsHandle {
    /// 渲染当前指标快照（Prometheus 文本格式）
    pub fn render(&self) -> String {
        self.prometheus.render()
    }
}

impl Drop for MetricsHandle {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

/// 初始化 Prometheus 指标导出
///
/// 安装全局 recorder，并启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(service_name: &str, port: u16) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics(service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let server_handle = start_metrics_server(addr, handle.clone()).await?;

    Ok(MetricsHandle {
        server_handle,
        prometheus: handle,
    })
}

/// 注册指标描述，这些描述会出现在 /metrics 端点的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!(
        PROCESSED_MESSAGES_TOTAL,
        "The total number of processed messages"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 指标路由：`/metrics` 与 `/health`
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }))
}

async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = router(handle);

    let listener = TcpListener::bind(addr).await?;
    info!("Starting Prometheus Metrics Server on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let (status, body) = get_body(router(recorder.handle()), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_renders_counter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!(PROCESSED_MESSAGES_TOTAL).increment(3);
        });

        let (status, body) = get_body(router(handle), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("onms_producer_processed_messages_total 3"));
    }
}
