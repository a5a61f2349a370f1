//! 消费会话错误类型
//!
//! 在共享库 ReceiverError 基础上定义本服务特有的错误变体：
//! 启动期的配置校验错误属于致命错误，解码/渲染/统计解析错误只影响单条消息或单次统计。

use receiver_shared::error::ReceiverError;
use thiserror::Error;

use crate::kind::MessageKind;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("source topic 不能为空")]
    EmptyTopic,

    #[error("消息类型不能为空")]
    EmptyMessageKind,

    #[error("无效的消息类型 {kind}，可选值: {valid}")]
    UnknownMessageKind { kind: String, valid: String },

    #[error("无效的 {kind} 消息: {source}")]
    Decode {
        kind: MessageKind,
        source: prost::DecodeError,
    },

    #[error("无法将 {kind} 消息转换为 JSON: {source}")]
    Render {
        kind: MessageKind,
        source: serde_json::Error,
    },

    #[error("统计信息解析失败: {0}")]
    Statistics(String),

    #[error("启动消费线程失败: {0}")]
    Worker(#[from] std::io::Error),

    /// 透传共享库错误（Kafka 连接创建、订阅等）
    #[error(transparent)]
    Shared(#[from] ReceiverError),
}

impl SessionError {
    /// 是否为启动期致命错误
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Decode { .. } | Self::Render { .. } | Self::Statistics(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(SessionError::EmptyTopic.to_string(), "source topic 不能为空");
        assert_eq!(
            SessionError::EmptyMessageKind.to_string(),
            "消息类型不能为空"
        );

        let err = SessionError::UnknownMessageKind {
            kind: "flow".to_string(),
            valid: "event, alarm".to_string(),
        };
        assert_eq!(err.to_string(), "无效的消息类型 flow，可选值: event, alarm");

        let err = SessionError::Shared(ReceiverError::Kafka("broker 不可达".to_string()));
        assert_eq!(err.to_string(), "Kafka 错误: broker 不可达");
    }

    #[test]
    fn test_is_fatal() {
        assert!(SessionError::EmptyTopic.is_fatal());
        assert!(SessionError::Shared(ReceiverError::ConnectionClosed).is_fatal());
        assert!(!SessionError::Statistics("bad".to_string()).is_fatal());
    }
}
