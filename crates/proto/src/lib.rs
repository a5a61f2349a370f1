//! OpenNMS Kafka Producer 消息定义
//!
//! 与 OpenNMS `opennms-kafka-producer.proto` 和 `collectionset.proto` 保持字段编号一致，
//! 直接使用 prost derive 声明，构建时不依赖 protoc。
//! 所有消息同时派生 `serde::Serialize`，用于渲染为 JSON。

pub mod collectionset;
pub mod producer;
