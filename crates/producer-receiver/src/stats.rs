//! 吞吐量统计日志
//!
//! librdkafka 按 `statistics.interval.ms` 周期上报 JSON 统计信息
//! （字段说明见 librdkafka STATISTICS.md），这里只读取已消费的消息数和字节数。

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::SessionError;

const UNIT: u64 = 1024;
const UNIT_PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// 统计信息中本服务关心的两个计数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputSnapshot {
    /// `rxmsgs`
    pub messages: u64,
    /// `rxmsg_bytes`
    pub bytes: u64,
}

/// 按 1024 进制换算为可读单位，例如 `1048576` -> `1.0 MiB`
pub fn byte_count(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!(
        "{:.1} {}iB",
        bytes as f64 / div as f64,
        UNIT_PREFIXES[exp]
    )
}

/// 解析统计信息 JSON
///
/// 字段缺失或类型不符时返回错误，由调用方决定是否忽略。
pub fn parse(raw: &[u8]) -> Result<ThroughputSnapshot, SessionError> {
    let stats: Map<String, Value> = serde_json::from_slice(raw)
        .map_err(|e| SessionError::Statistics(format!("不是合法的 JSON 对象: {e}")))?;

    Ok(ThroughputSnapshot {
        messages: read_counter(&stats, "rxmsgs")?,
        bytes: read_counter(&stats, "rxmsg_bytes")?,
    })
}

fn read_counter(stats: &Map<String, Value>, key: &str) -> Result<u64, SessionError> {
    let value = stats
        .get(key)
        .ok_or_else(|| SessionError::Statistics(format!("缺少字段 {key}")))?;

    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
        })
        .ok_or_else(|| SessionError::Statistics(format!("字段 {key} 不是非负数值: {value}")))
}

/// 输出一行吞吐量日志，解析失败只记录警告
pub fn report(raw: &[u8]) {
    match parse(raw) {
        Ok(snapshot) => info!(
            messages = snapshot.messages,
            bytes = snapshot.bytes,
            "statistics: {} messages ({}) consumed",
            snapshot.messages,
            byte_count(snapshot.bytes)
        ),
        Err(e) => warn!(error = %e, "忽略无法解析的统计信息"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_count_base_units() {
        assert_eq!(byte_count(0), "0 B");
        assert_eq!(byte_count(512), "512 B");
        assert_eq!(byte_count(1023), "1023 B");
    }

    #[test]
    fn test_byte_count_powers_of_1024_roll_over() {
        assert_eq!(byte_count(1024), "1.0 KiB");
        assert_eq!(byte_count(1_048_576), "1.0 MiB");
        assert_eq!(byte_count(1 << 30), "1.0 GiB");
        assert_eq!(byte_count(1 << 40), "1.0 TiB");
        assert_eq!(byte_count(1 << 50), "1.0 PiB");
        assert_eq!(byte_count(1 << 60), "1.0 EiB");
    }

    #[test]
    fn test_byte_count_fractional_and_upper_bound() {
        assert_eq!(byte_count(1536), "1.5 KiB");
        // 低于下一个单位时保持当前单位
        assert_eq!(byte_count(1_048_575), "1024.0 KiB");
        assert_eq!(byte_count(u64::MAX), "16.0 EiB");
    }

    #[test]
    fn test_parse_integer_and_float_counters() {
        let snapshot = parse(br#"{"name":"rdkafka#consumer-1","rxmsgs":10,"rxmsg_bytes":2048.0}"#)
            .unwrap();
        assert_eq!(
            snapshot,
            ThroughputSnapshot {
                messages: 10,
                bytes: 2048
            }
        );
    }

    #[test]
    fn test_parse_missing_or_wrong_type_fields() {
        let err = parse(br#"{"rxmsgs":10}"#).unwrap_err();
        assert!(err.to_string().contains("rxmsg_bytes"));

        let err = parse(br#"{"rxmsgs":10,"rxmsg_bytes":"lots"}"#).unwrap_err();
        assert!(err.to_string().contains("rxmsg_bytes"));

        assert!(parse(br#"{"rxmsgs":-1,"rxmsg_bytes":0}"#).is_err());
        assert!(parse(b"[1,2,3]").is_err());
        assert!(parse(b"not json").is_err());
    }

    #[test]
    fn test_report_never_panics() {
        report(b"{}");
        report(b"garbage");
        report(br#"{"rxmsgs":1,"rxmsg_bytes":1}"#);
    }
}
