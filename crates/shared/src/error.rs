//! 统一错误处理模块
//!
//! 定义基础设施层（配置加载、Kafka 客户端）共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 基础设施错误类型
#[derive(Debug, Error)]
pub enum ReceiverError {
    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    // ==================== Kafka 错误 ====================
    #[error("Kafka 错误: {0}")]
    Kafka(String),

    #[error("Kafka 连接已关闭")]
    ConnectionClosed,
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, ReceiverError>;

impl ReceiverError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Kafka(_) => "KAFKA_ERROR",
            Self::ConnectionClosed => "CONNECTION_CLOSED",
        }
    }
}

impl From<rdkafka::error::KafkaError> for ReceiverError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::Kafka(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = ReceiverError::InvalidArgument {
            field: "topic".to_string(),
            message: "不能为空".to_string(),
        };
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(ReceiverError::ConnectionClosed.code(), "CONNECTION_CLOSED");
    }

    #[test]
    fn test_error_display() {
        let err = ReceiverError::Kafka("broker 不可达".to_string());
        assert_eq!(err.to_string(), "Kafka 错误: broker 不可达");

        let err = ReceiverError::InvalidArgument {
            field: "topic".to_string(),
            message: "不能为空".to_string(),
        };
        assert_eq!(err.to_string(), "无效的参数: topic - 不能为空");
    }
}
