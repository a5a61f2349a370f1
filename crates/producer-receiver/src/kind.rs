//! 消息类型注册表
//!
//! 一个 topic 只承载一种 OpenNMS Producer 消息，类型在启动时配置并校验，
//! 运行期不再变化。

use std::fmt;
use std::str::FromStr;

use receiver_shared::config::KafkaConfig;

use crate::error::SessionError;

/// topic 上的消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Event,
    Alarm,
    Node,
    Edge,
    Metric,
}

impl MessageKind {
    /// 全部可选类型，顺序即帮助信息中的展示顺序
    pub const ALL: [MessageKind; 5] = [
        MessageKind::Event,
        MessageKind::Alarm,
        MessageKind::Node,
        MessageKind::Edge,
        MessageKind::Metric,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Alarm => "alarm",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Metric => "metric",
        }
    }

    /// 对应的 protobuf 消息名
    pub fn record_type(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Alarm => "Alarm",
            Self::Node => "Node",
            Self::Edge => "TopologyEdge",
            Self::Metric => "CollectionSet",
        }
    }

    /// 逗号分隔的可选值列表
    pub fn valid_options() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SessionError::EmptyMessageKind);
        }
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SessionError::UnknownMessageKind {
                kind: s.to_string(),
                valid: Self::valid_options(),
            })
    }
}

/// 启动期配置校验，返回解析后的消息类型
pub fn validate(config: &KafkaConfig) -> Result<MessageKind, SessionError> {
    if config.topic.is_empty() {
        return Err(SessionError::EmptyTopic);
    }
    config.message_kind.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(topic: &str, kind: &str) -> KafkaConfig {
        KafkaConfig {
            topic: topic.to_string(),
            message_kind: kind.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_kind_validates() {
        for kind in MessageKind::ALL {
            assert_eq!(validate(&config("opennms", kind.as_str())).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_lists_valid_options() {
        let err = validate(&config("opennms", "flow")).unwrap_err();
        assert!(matches!(err, SessionError::UnknownMessageKind { .. }));

        let message = err.to_string();
        assert!(message.contains("flow"));
        assert!(message.contains("event, alarm, node, edge, metric"));
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert!("Alarm".parse::<MessageKind>().is_err());
    }

    #[test]
    fn test_empty_topic_and_kind_are_rejected() {
        assert!(matches!(
            validate(&config("", "alarm")),
            Err(SessionError::EmptyTopic)
        ));
        assert!(matches!(
            validate(&config("opennms", "")),
            Err(SessionError::EmptyMessageKind)
        ));
    }

    #[test]
    fn test_record_type_names() {
        assert_eq!(MessageKind::Edge.record_type(), "TopologyEdge");
        assert_eq!(MessageKind::Metric.record_type(), "CollectionSet");
        assert_eq!(MessageKind::Alarm.to_string(), "alarm");
    }
}
