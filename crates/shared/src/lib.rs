//! 共享库
//!
//! 包含配置加载、错误处理、Kafka 连接和可观测性等基础设施代码。

pub mod config;
pub mod error;
pub mod kafka;
pub mod observability;
