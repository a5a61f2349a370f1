//! Kafka 基础设施封装
//!
//! 将 rdkafka 的 `BaseConsumer` 封装为同步拉取的连接抽象：
//! 一次 `poll` 返回一条消息、一个客户端错误或一份统计信息，
//! 消费循环只依赖 [`BrokerConnection`]，便于在测试中替换为内存实现。

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;
use rdkafka::client::ClientContext;
use rdkafka::config::{ClientConfig, RDKafkaLogLevel};
use rdkafka::consumer::{BaseConsumer, CommitMode, Consumer, ConsumerContext};
use rdkafka::error::KafkaError;
use rdkafka::message::{BorrowedMessage, Message};
use rdkafka::{Offset, TopicPartitionList};
use tracing::{debug, error, info, warn};

use crate::error::{ReceiverError, Result};

// ---------------------------------------------------------------------------
// ClientProperties
// ---------------------------------------------------------------------------

/// 传给 librdkafka 的客户端属性表
///
/// 固定默认值之外的属性由用户以 `key=value` CSV 形式覆盖，
/// 同名键以用户值为准。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientProperties {
    entries: BTreeMap<String, String>,
}

impl ClientProperties {
    pub const SESSION_TIMEOUT_MS: &'static str = "6000";
    pub const BROKER_ADDRESS_FAMILY: &'static str = "v4";

    /// 由必填字段和覆盖参数构建属性表
    pub fn build(bootstrap: &str, group_id: &str, overrides: &str) -> Self {
        let mut properties = Self::default();
        properties
            .set("bootstrap.servers", bootstrap)
            .set("group.id", group_id)
            .set("session.timeout.ms", Self::SESSION_TIMEOUT_MS)
            .set("broker.address.family", Self::BROKER_ADDRESS_FAMILY)
            // 位点只在业务处理完成后显式提交
            .set("enable.auto.commit", "false");

        for (key, value) in parse_overrides(overrides) {
            properties.set(key, value);
        }
        properties
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 转换为 rdkafka 客户端配置
    pub fn to_client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        for (key, value) in self.iter() {
            config.set(key, value);
        }
        config
    }
}

/// 解析 `key=value` CSV 覆盖参数
///
/// 每一项必须按 `=` 恰好切分为两个非空部分，否则记录警告并跳过，不会中断启动。
pub fn parse_overrides(csv: &str) -> Vec<(String, String)> {
    if csv.trim().is_empty() {
        return Vec::new();
    }

    csv.split(',')
        .filter_map(|pair| {
            let tokens: Vec<&str> = pair.split('=').map(str::trim).collect();
            match tokens.as_slice() {
                [key, value] if !key.is_empty() && !value.is_empty() => {
                    Some((key.to_string(), value.to_string()))
                }
                _ => {
                    warn!(pair, "无效的键值对，已忽略");
                    None
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// InboundMessage / BrokerEvent
// ---------------------------------------------------------------------------

/// 拉取到的单条消息
///
/// 从 `BorrowedMessage` 复制出所有字段，处理完成后即丢弃。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
    pub timestamp: Option<i64>,
}

impl InboundMessage {
    fn from_borrowed(msg: &BorrowedMessage<'_>) -> Self {
        Self {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            key: msg.key().map(<[u8]>::to_vec),
            payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
            timestamp: msg.timestamp().to_millis(),
        }
    }

    /// 用于日志输出的 key，非 UTF-8 字节以替换字符显示
    pub fn key_display(&self) -> String {
        self.key
            .as_deref()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .unwrap_or_default()
    }
}

/// 一次 poll 的结果
#[derive(Debug)]
pub enum BrokerEvent {
    Message(InboundMessage),
    /// 客户端层错误，librdkafka 内部会自行重连
    Error(ReceiverError),
    /// librdkafka 统计信息原始 JSON（需配置 `statistics.interval.ms`）
    Statistics(Vec<u8>),
}

/// 消费循环所依赖的连接接口
///
/// 连接只被单个消费循环独占使用，因此方法均取 `&mut self`。
pub trait BrokerConnection: Send {
    fn subscribe(&mut self, topic: &str) -> Result<()>;

    /// 最多阻塞 `timeout`，超时无事件时返回 `None`
    fn poll(&mut self, timeout: Duration) -> Option<BrokerEvent>;

    /// 同步提交该消息之后的位点（offset + 1）
    fn commit(&mut self, message: &InboundMessage) -> Result<()>;

    /// 释放连接，重复调用无副作用
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// ReceiverContext
// ---------------------------------------------------------------------------

/// 回调事件队列上限，防止 broker 长时间不可用时错误事件无限堆积
const MAX_PENDING_EVENTS: usize = 1024;

/// 自定义客户端上下文
///
/// librdkafka 在 poll 过程中通过回调上报统计信息和客户端错误，
/// 这里先放入队列，再由 [`KafkaConnection::poll`] 作为事件逐个返回。
#[derive(Default)]
pub struct ReceiverContext {
    pending: Mutex<VecDeque<BrokerEvent>>,
}

impl ReceiverContext {
    fn push(&self, event: BrokerEvent) {
        let mut pending = self.pending.lock();
        if pending.len() >= MAX_PENDING_EVENTS {
            debug!("回调事件队列已满，丢弃最早的事件");
            pending.pop_front();
        }
        pending.push_back(event);
    }

    fn take_pending(&self) -> Option<BrokerEvent> {
        self.pending.lock().pop_front()
    }
}

impl ClientContext for ReceiverContext {
    fn log(&self, level: RDKafkaLogLevel, fac: &str, log_message: &str) {
        match level {
            RDKafkaLogLevel::Emerg
            | RDKafkaLogLevel::Alert
            | RDKafkaLogLevel::Critical
            | RDKafkaLogLevel::Error => error!(target: "librdkafka", fac, "{log_message}"),
            RDKafkaLogLevel::Warning => warn!(target: "librdkafka", fac, "{log_message}"),
            RDKafkaLogLevel::Notice | RDKafkaLogLevel::Info => {
                info!(target: "librdkafka", fac, "{log_message}")
            }
            RDKafkaLogLevel::Debug => debug!(target: "librdkafka", fac, "{log_message}"),
        }
    }

    fn stats_raw(&self, statistics: &[u8]) {
        self.push(BrokerEvent::Statistics(statistics.to_vec()));
    }

    fn error(&self, error: KafkaError, reason: &str) {
        self.push(BrokerEvent::Error(ReceiverError::Kafka(format!(
            "{error}: {reason}"
        ))));
    }
}

impl ConsumerContext for ReceiverContext {}

// ---------------------------------------------------------------------------
// KafkaConnection
// ---------------------------------------------------------------------------

/// 基于 `BaseConsumer` 的 Kafka 连接
pub struct KafkaConnection {
    consumer: Option<BaseConsumer<ReceiverContext>>,
}

impl KafkaConnection {
    /// 按属性表创建消费者
    pub fn create(properties: &ClientProperties) -> Result<Self> {
        let consumer: BaseConsumer<ReceiverContext> = properties
            .to_client_config()
            .create_with_context(ReceiverContext::default())
            .map_err(|e| ReceiverError::Kafka(format!("创建消费者失败: {e}")))?;

        info!(
            bootstrap = properties.get("bootstrap.servers").unwrap_or_default(),
            group_id = properties.get("group.id").unwrap_or_default(),
            "Kafka 消费者已初始化"
        );
        Ok(Self {
            consumer: Some(consumer),
        })
    }

    fn consumer(&self) -> Result<&BaseConsumer<ReceiverContext>> {
        self.consumer.as_ref().ok_or(ReceiverError::ConnectionClosed)
    }
}

impl BrokerConnection for KafkaConnection {
    fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.consumer()?
            .subscribe(&[topic])
            .map_err(|e| ReceiverError::Kafka(format!("订阅 topic {topic} 失败: {e}")))?;

        info!(topic, "已订阅 Kafka topic");
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Option<BrokerEvent> {
        let consumer = self.consumer.as_ref()?;

        if let Some(event) = consumer.context().take_pending() {
            return Some(event);
        }

        match consumer.poll(timeout) {
            Some(Ok(msg)) => Some(BrokerEvent::Message(InboundMessage::from_borrowed(&msg))),
            Some(Err(e)) => Some(BrokerEvent::Error(e.into())),
            None => consumer.context().take_pending(),
        }
    }

    fn commit(&mut self, message: &InboundMessage) -> Result<()> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &message.topic,
            message.partition,
            Offset::Offset(message.offset + 1),
        )
        .map_err(|e| ReceiverError::Kafka(format!("构造提交位点失败: {e}")))?;

        self.consumer()?
            .commit(&tpl, CommitMode::Sync)
            .map_err(|e| ReceiverError::Kafka(format!("提交位点失败: {e}")))
    }

    fn close(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.unsubscribe();
            // BaseConsumer 在 drop 时执行 rd_kafka_consumer_close
            drop(consumer);
            info!("Kafka 消费者已关闭");
        }
    }
}

// ---------------------------------------------------------------------------
// 测试
// ---------------------------------------------------------------------------
