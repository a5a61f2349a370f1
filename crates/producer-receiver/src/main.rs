//! OpenNMS Producer 消息接收服务
//!
//! 消费指定 topic，将每条消息渲染为 JSON 写入日志，Ctrl-C 时有序退出。

use clap::Parser;
use producer_receiver::ClientSession;
use receiver_shared::config::AppConfig;
use receiver_shared::observability;
use tracing::{error, info};

const SERVICE_NAME: &str = "producer-receiver";

/// 命令行参数，未指定的项使用配置文件或环境变量中的值
#[derive(Parser, Debug)]
#[command(name = "producer-receiver")]
#[command(version, about = "OpenNMS Kafka Producer 消息接收工具")]
struct Cli {
    /// Kafka bootstrap 地址
    #[arg(short, long)]
    bootstrap: Option<String>,

    /// source topic
    #[arg(short, long)]
    topic: Option<String>,

    /// consumer group ID
    #[arg(short, long)]
    group_id: Option<String>,

    /// 消息类型: event, alarm, node, edge, metric
    #[arg(short, long)]
    message_kind: Option<String>,

    /// 额外的 librdkafka 参数，格式 key1=value1,key2=value2
    #[arg(short, long)]
    parameters: Option<String>,

    /// 在日志中输出完整的 JSON 消息
    #[arg(short, long)]
    display: bool,

    /// Prometheus 指标端口
    #[arg(long)]
    metrics_port: Option<u16>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        let kafka = &mut config.kafka;
        if let Some(bootstrap) = self.bootstrap {
            kafka.bootstrap = bootstrap;
        }
        if let Some(topic) = self.topic {
            kafka.topic = topic;
        }
        if let Some(group_id) = self.group_id {
            kafka.group_id = group_id;
        }
        if let Some(message_kind) = self.message_kind {
            kafka.message_kind = message_kind;
        }
        if let Some(parameters) = self.parameters {
            kafka.parameters = parameters;
        }
        if let Some(port) = self.metrics_port {
            config.observability.metrics_port = port;
        }
        config.display |= self.display;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(SERVICE_NAME)?;
    cli.apply(&mut config);

    let _guard = observability::init(SERVICE_NAME, &config.observability).await?;

    let session = ClientSession::connect(&config.kafka)?;
    let kind = session.kind();
    let display = config.display;

    let mut handle = session.start(move |payload: &[u8]| {
        if display {
            info!(message_kind = %kind, "{}", String::from_utf8_lossy(payload));
        } else {
            info!(message_kind = %kind, bytes = payload.len(), "message processed");
        }
    })?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "无法监听退出信号");
    }

    // join 会阻塞直到当前 poll 返回
    let processed = tokio::task::spawn_blocking(move || handle.stop()).await?;
    info!(processed = processed.unwrap_or_default(), "服务已退出");

    Ok(())
}
