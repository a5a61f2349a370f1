//! 消费会话
//!
//! 会话独占一条 broker 连接，在独立线程中循环 poll：
//! 解码 -> 计数 -> 同步调用处理函数 -> 提交位点。
//! 位点在处理函数返回后才提交，保证处理函数至少收到一次；
//! 解码失败的消息直接提交，避免坏消息阻塞分区。

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use receiver_shared::config::KafkaConfig;
use receiver_shared::error::Result as SharedResult;
use receiver_shared::kafka::{
    BrokerConnection, BrokerEvent, ClientProperties, InboundMessage, KafkaConnection,
};
use tracing::{error, info, warn};

use crate::counter::ProcessedCounter;
use crate::decoder::RecordDecoder;
use crate::error::SessionError;
use crate::kind::{self, MessageKind};
use crate::stats;

/// 单次 poll 的最长等待时间，也是停止请求的最大响应延迟
pub const POLL_TIMEOUT: Duration = Duration::from_millis(500);

const WORKER_THREAD_NAME: &str = "producer-receiver-consumer";

// ---------------------------------------------------------------------------
// 生命周期
// ---------------------------------------------------------------------------

/// 会话生命周期：Uninitialized -> Running -> Stopping -> Closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Uninitialized = 0,
    Running = 1,
    Stopping = 2,
    Closed = 3,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Stopping,
            3 => Self::Closed,
            _ => Self::Uninitialized,
        }
    }
}

/// 消费线程与外部之间唯一共享的状态
///
/// 停止标志只由停止方写入、消费循环读取；状态只用于观测。
#[derive(Debug)]
pub struct SessionControl {
    stopping: AtomicBool,
    state: AtomicU8,
}

impl SessionControl {
    fn new() -> Self {
        Self {
            stopping: AtomicBool::new(false),
            state: AtomicU8::new(SessionState::Uninitialized as u8),
        }
    }

    /// 请求停止，仅第一次调用返回 `true`
    ///
    /// 消费循环在下一轮迭代开始时观察到标志后退出，不会打断进行中的 poll 或处理函数。
    pub fn request_stop(&self) -> bool {
        if self.stopping.swap(true, Ordering::AcqRel) {
            return false;
        }
        let _ = self.state.compare_exchange(
            SessionState::Running as u8,
            SessionState::Stopping as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        true
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// MessageHandler
// ---------------------------------------------------------------------------

/// 调用方提供的消息处理函数，参数为渲染后的 JSON
///
/// 在消费线程中同步执行，执行期间不会拉取新消息。
/// 处理函数 panic 时只记录日志，位点照常提交，消息不会重新投递。
pub trait MessageHandler: Send {
    fn handle(&mut self, payload: &[u8]);
}

impl<F> MessageHandler for F
where
    F: FnMut(&[u8]) + Send,
{
    fn handle(&mut self, payload: &[u8]) {
        self(payload)
    }
}

/// 单条消息的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// 解码成功，处理函数正常返回
    Handled,
    /// 解码成功，处理函数 panic
    HandlerPanicked,
    /// 解码或渲染失败，未调用处理函数
    Skipped,
}

// ---------------------------------------------------------------------------
// ClientSession
// ---------------------------------------------------------------------------

/// 单 topic 消费会话
pub struct ClientSession<C: BrokerConnection> {
    config: KafkaConfig,
    decoder: RecordDecoder,
    connection: C,
    counter: ProcessedCounter,
    control: Arc<SessionControl>,
}

impl ClientSession<KafkaConnection> {
    /// 使用 rdkafka 连接初始化会话
    pub fn connect(config: &KafkaConfig) -> Result<Self, SessionError> {
        Self::initialize(config, KafkaConnection::create)
    }
}

impl<C: BrokerConnection + 'static> ClientSession<C> {
    /// 校验配置、构建客户端属性、创建连接并订阅 topic
    ///
    /// 任一步失败都是致命错误，会话不会启动。
    pub fn initialize<F>(config: &KafkaConfig, connect: F) -> Result<Self, SessionError>
    where
        F: FnOnce(&ClientProperties) -> SharedResult<C>,
    {
        let kind = kind::validate(config)?;
        let counter = ProcessedCounter::new();
        let properties =
            ClientProperties::build(&config.bootstrap, &config.group_id, &config.parameters);

        info!(
            topic = %config.topic,
            bootstrap = %config.bootstrap,
            "creating consumer"
        );
        let mut connection = connect(&properties)?;

        if let Err(e) = connection.subscribe(&config.topic) {
            connection.close();
            return Err(e.into());
        }

        let control = Arc::new(SessionControl::new());
        control.set_state(SessionState::Running);

        Ok(Self {
            config: config.clone(),
            decoder: RecordDecoder::new(kind),
            connection,
            counter,
            control,
        })
    }

    pub fn kind(&self) -> MessageKind {
        self.decoder.kind()
    }

    pub fn control(&self) -> Arc<SessionControl> {
        Arc::clone(&self.control)
    }

    pub fn counter(&self) -> ProcessedCounter {
        self.counter.clone()
    }

    /// 在专用线程中运行消费循环
    pub fn start<H>(self, handler: H) -> Result<ConsumerHandle, SessionError>
    where
        H: MessageHandler + 'static,
    {
        let control = self.control();
        let counter = self.counter();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run(handler))?;

        Ok(ConsumerHandle {
            control,
            counter,
            worker: Some(worker),
        })
    }

    /// 在当前线程运行消费循环，直到收到停止请求
    ///
    /// 循环退出后由本方法关闭连接，返回已处理的消息数。
    pub fn run<H: MessageHandler>(mut self, mut handler: H) -> u64 {
        info!(
            topic = %self.config.topic,
            bootstrap = %self.config.bootstrap,
            group_id = %self.config.group_id,
            message_kind = %self.kind(),
            parameters = %self.config.parameters,
            "starting kafka consumer"
        );

        while !self.control.is_stopping() {
            match self.connection.poll(POLL_TIMEOUT) {
                Some(BrokerEvent::Message(msg)) => {
                    self.process(&msg, &mut handler);
                }
                Some(BrokerEvent::Error(e)) => {
                    error!(error = %e, "consumer error");
                }
                Some(BrokerEvent::Statistics(raw)) => stats::report(&raw),
                None => {}
            }
        }

        self.control.set_state(SessionState::Stopping);
        self.connection.close();
        self.control.set_state(SessionState::Closed);

        let processed = self.counter.get();
        info!(processed, "kafka consumer closed");
        processed
    }

    /// 处理单条消息：解码 -> 计数 -> 调用处理函数 -> 提交位点
    pub fn process<H: MessageHandler>(
        &mut self,
        msg: &InboundMessage,
        handler: &mut H,
    ) -> MessageOutcome {
        let outcome = match self.decoder.convert(&msg.payload) {
            Ok(rendered) => {
                self.counter.increment();
                info!(
                    key = %msg.key_display(),
                    partition = msg.partition,
                    offset = msg.offset,
                    "message received"
                );

                match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&rendered))) {
                    Ok(()) => MessageOutcome::Handled,
                    Err(_) => {
                        error!(
                            partition = msg.partition,
                            offset = msg.offset,
                            "消息处理函数 panic，位点仍将提交"
                        );
                        MessageOutcome::HandlerPanicked
                    }
                }
            }
            Err(e) => {
                warn!(
                    message_kind = %self.decoder.kind(),
                    error = %e,
                    partition = msg.partition,
                    offset = msg.offset,
                    "收到无效消息，跳过处理"
                );
                MessageOutcome::Skipped
            }
        };

        // 处理函数失败时消息也不会被重新处理
        if let Err(e) = self.connection.commit(msg) {
            error!(
                error = %e,
                partition = msg.partition,
                offset = msg.offset,
                "error committing message"
            );
        }

        outcome
    }
}

// ---------------------------------------------------------------------------
// ConsumerHandle
// ---------------------------------------------------------------------------

/// 运行中会话的句柄
///
/// `stop` 先置停止标志再等待消费线程退出，连接由消费线程在循环结束后关闭，
/// 因此关闭连接一定发生在最后一次 poll 之后。drop 时自动停止。
pub struct ConsumerHandle {
    control: Arc<SessionControl>,
    counter: ProcessedCounter,
    worker: Option<JoinHandle<u64>>,
}

impl ConsumerHandle {
    pub fn state(&self) -> SessionState {
        self.control.state()
    }

    /// 当前已处理的消息数
    pub fn processed(&self) -> u64 {
        self.counter.get()
    }

    /// 停止消费并等待线程退出，返回已处理的消息数
    ///
    /// 重复调用返回 `None`。
    pub fn stop(&mut self) -> Option<u64> {
        let worker = self.worker.take()?;

        info!("stopping consumer");
        self.control.request_stop();

        match worker.join() {
            Ok(processed) => {
                info!(processed, "good bye!");
                Some(processed)
            }
            Err(_) => {
                error!("消费线程异常退出");
                self.control.set_state(SessionState::Closed);
                None
            }
        }
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// 测试
// ---------------------------------------------------------------------------
