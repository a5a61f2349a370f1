//! OpenNMS Producer 消息接收服务
//!
//! 从单个 Kafka topic 消费 OpenNMS Kafka Producer 发布的 protobuf 消息
//! （事件、告警、节点、拓扑边、指标集合），解码后渲染为 JSON 交给处理函数，
//! 处理完成后提交位点。

pub mod consumer;
pub mod counter;
pub mod decoder;
pub mod error;
pub mod kind;
pub mod stats;

pub use consumer::{ClientSession, ConsumerHandle, MessageHandler, SessionState};
pub use error::SessionError;
pub use kind::MessageKind;
