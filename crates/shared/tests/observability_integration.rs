//! 可观测性模块集成测试
//!
//! 全局 recorder 与日志订阅者每个进程只能安装一次，因此集中在单个测试中验证。

use receiver_shared::config::ObservabilityConfig;
use receiver_shared::observability;
use receiver_shared::observability::metrics::PROCESSED_MESSAGES_TOTAL;

#[tokio::test]
async fn test_init_installs_recorder_and_exports_counters() {
    let config = ObservabilityConfig {
        // 端口 0 由系统分配，避免与本机其他服务冲突
        metrics_port: 0,
        ..Default::default()
    };

    let guard = observability::init("producer-receiver", &config)
        .await
        .expect("初始化可观测性失败");

    metrics::counter!(PROCESSED_MESSAGES_TOTAL).increment(2);

    let rendered = guard.metrics().expect("应启用 metrics").render();
    assert!(rendered.contains("onms_producer_processed_messages_total 2"));
    assert!(rendered.contains("service_starts_total"));
}
