//! # 客户端配置数据模型
//!
//! 定义客户端配置（ClientConfig），存储于 `~/.murder-ai/client-config.json`。
//! 所有字段都有默认值：配置文件缺失或字段缺失时使用默认值补齐。

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 客户端配置
///
/// 对应配置文件：
/// ```json
/// {
///   "serverUrl": "http://127.0.0.1:7860",
///   "bridgePath": "/api/bridge",
///   "portraitCatalog": "http://127.0.0.1:7860/static/portraits.json",
///   "handshakeIntervalMs": 2000,
///   "typingIntervalMs": 30,
///   "resultCloseDelayMs": 5000,
///   "requestTimeoutSecs": 30
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// 游戏服务端根地址
    pub server_url: String,

    /// 桥接端点路径
    pub bridge_path: String,

    /// 头像目录来源：`http(s)://` 开头按 URL 下载，否则按本地文件路径读取；
    /// 为 None 时不加载，所有头像走位置默认值
    pub portrait_catalog: Option<String>,

    /// 握手重试间隔（毫秒）
    pub handshake_interval_ms: u64,

    /// 嫌疑人消息逐字显示间隔（毫秒）
    pub typing_interval_ms: u64,

    /// 工具结果自动关闭延迟（毫秒）
    pub result_close_delay_ms: u64,

    /// 单次桥接请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:7860".to_string(),
            bridge_path: "/api/bridge".to_string(),
            portrait_catalog: None,
            handshake_interval_ms: 2000,
            typing_interval_ms: 30,
            result_close_delay_ms: 5000,
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// 完整的桥接端点 URL
    pub fn bridge_url(&self) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.bridge_path.trim_start_matches('/')
        )
    }

    /// 引擎时长；配置为 0 的间隔按 [`MIN_INTERVAL`] 处理
    pub fn timings(&self) -> Timings {
        Timings {
            handshake_interval: Duration::from_millis(self.handshake_interval_ms),
            typing_interval: Duration::from_millis(self.typing_interval_ms),
            result_close_delay: Duration::from_millis(self.result_close_delay_ms),
        }
        .clamped()
    }
}

/// 定时器间隔下限：零间隔的周期任务会在同一时刻无限重排
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// 引擎使用的三个固定时长
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub handshake_interval: Duration,
    pub typing_interval: Duration,
    pub result_close_delay: Duration,
}

impl Timings {
    /// 把每个时长抬到 [`MIN_INTERVAL`] 以上
    pub fn clamped(self) -> Self {
        Self {
            handshake_interval: self.handshake_interval.max(MIN_INTERVAL),
            typing_interval: self.typing_interval.max(MIN_INTERVAL),
            result_close_delay: self.result_close_delay.max(MIN_INTERVAL),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        ClientConfig::default().timings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_url_joins_without_double_slash() {
        let config = ClientConfig {
            server_url: "http://localhost:7860/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.bridge_url(), "http://localhost:7860/api/bridge");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "serverUrl": "http://game:9000" }"#).unwrap();
        assert_eq!(config.server_url, "http://game:9000");
        assert_eq!(config.handshake_interval_ms, 2000);
        assert_eq!(config.result_close_delay_ms, 5000);
    }

    #[test]
    fn test_zero_intervals_are_raised_to_minimum() {
        let config: ClientConfig = serde_json::from_str(
            r#"{ "handshakeIntervalMs": 0, "typingIntervalMs": 0, "resultCloseDelayMs": 0 }"#,
        )
        .unwrap();
        let timings = config.timings();
        assert_eq!(timings.handshake_interval, MIN_INTERVAL);
        assert_eq!(timings.typing_interval, MIN_INTERVAL);
        assert_eq!(timings.result_close_delay, MIN_INTERVAL);
        assert_eq!(ClientConfig::default().timings().handshake_interval, Duration::from_secs(2));
    }
}
