//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kafka 消费配置
///
/// `parameters` 为逗号分隔的 `key=value` 列表，直接透传给 librdkafka，
/// 例如 `statistics.interval.ms=30000,auto.offset.reset=earliest`。
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub bootstrap: String,
    pub topic: String,
    pub group_id: String,
    pub message_kind: String,
    pub parameters: String,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            bootstrap: "localhost:9092".to_string(),
            topic: "alarms".to_string(),
            group_id: "producer-receiver".to_string(),
            message_kind: "alarm".to_string(),
            parameters: String::new(),
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_port: 8181,
        }
    }
}

impl ObservabilityConfig {
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub kafka: KafkaConfig,
    pub observability: ObservabilityConfig,
    /// 是否在日志中完整输出每条渲染后的消息
    pub display: bool,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（RECEIVER_ 前缀，层级用双下划线，如 RECEIVER_KAFKA__GROUP_ID -> kafka.group_id）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("RECEIVER_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env, service_name)
    }

    fn load_from(config_dir: &Path, env: &str, service_name: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{env}.toml"))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{service_name}.toml"))).required(false),
            )
            .add_source(
                Environment::with_prefix("RECEIVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
