//! 消息解码与渲染
//!
//! 按会话配置的消息类型将 protobuf 负载解码为具体记录，
//! 再渲染为两空格缩进的 JSON 交给业务处理函数。

use prost::Message;
use receiver_proto::collectionset::CollectionSet;
use receiver_proto::producer::{Alarm, Event, Node, TopologyEdge};
use serde::Serialize;

use crate::error::SessionError;
use crate::kind::MessageKind;

/// 解码后的记录
///
/// 同一会话内只会出现一种变体，由 [`RecordDecoder`] 的消息类型决定。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedRecord {
    Event(Event),
    Alarm(Alarm),
    Node(Node),
    TopologyEdge(TopologyEdge),
    MetricCollection(CollectionSet),
}

impl DecodedRecord {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Event(_) => MessageKind::Event,
            Self::Alarm(_) => MessageKind::Alarm,
            Self::Node(_) => MessageKind::Node,
            Self::TopologyEdge(_) => MessageKind::Edge,
            Self::MetricCollection(_) => MessageKind::Metric,
        }
    }

    /// 渲染为缩进 JSON
    pub fn render(&self) -> Result<Vec<u8>, SessionError> {
        serde_json::to_vec_pretty(self).map_err(|source| SessionError::Render {
            kind: self.kind(),
            source,
        })
    }
}

/// 绑定单一消息类型的解码器，每个会话构造一次
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    kind: MessageKind,
}

impl RecordDecoder {
    pub fn new(kind: MessageKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn decode(&self, payload: &[u8]) -> Result<DecodedRecord, SessionError> {
        let record = match self.kind {
            MessageKind::Event => Event::decode(payload).map(DecodedRecord::Event),
            MessageKind::Alarm => Alarm::decode(payload).map(DecodedRecord::Alarm),
            MessageKind::Node => Node::decode(payload).map(DecodedRecord::Node),
            MessageKind::Edge => TopologyEdge::decode(payload).map(DecodedRecord::TopologyEdge),
            MessageKind::Metric => {
                CollectionSet::decode(payload).map(DecodedRecord::MetricCollection)
            }
        };

        record.map_err(|source| SessionError::Decode {
            kind: self.kind,
            source,
        })
    }

    /// 解码并渲染，任一步失败都返回错误
    pub fn convert(&self, payload: &[u8]) -> Result<Vec<u8>, SessionError> {
        self.decode(payload)?.render()
    }
}
