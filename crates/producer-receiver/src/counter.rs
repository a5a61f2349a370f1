//! 已处理消息计数器

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use receiver_shared::observability::metrics::PROCESSED_MESSAGES_TOTAL;

/// 成功处理的消息数
///
/// 由会话持有并只在消费线程中递增；本地原子值供句柄读取，
/// 同时同步到 `metrics` 计数器，由 Prometheus exporter 导出。
#[derive(Clone)]
pub struct ProcessedCounter {
    local: Arc<AtomicU64>,
    exported: metrics::Counter,
}

impl ProcessedCounter {
    /// 从当前安装的 recorder 注册计数器，未安装时仅保留本地计数
    pub fn new() -> Self {
        Self {
            local: Arc::new(AtomicU64::new(0)),
            exported: metrics::counter!(PROCESSED_MESSAGES_TOTAL),
        }
    }

    pub fn increment(&self) {
        self.local.fetch_add(1, Ordering::Relaxed);
        self.exported.increment(1);
    }

    pub fn get(&self) -> u64 {
        self.local.load(Ordering::Relaxed)
    }
}

impl Default for ProcessedCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProcessedCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedCounter")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_clones_share_value() {
        let counter = ProcessedCounter::new();
        let reader = counter.clone();

        counter.increment();
        counter.increment();

        assert_eq!(reader.get(), 2);
    }

    #[test]
    fn test_increment_is_exported() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let counter = metrics::with_local_recorder(&recorder, ProcessedCounter::new);

        counter.increment();

        assert_eq!(counter.get(), 1);
        assert!(
            handle
                .render()
                .contains("onms_producer_processed_messages_total 1")
        );
    }
}
