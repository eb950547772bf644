//! # 桥接服务
//!
//! 客户端与游戏服务端之间唯一的通道：每个动作序列化为一个 `{ action, data }` 请求，
//! 响应本身也是一个带标签的事件（或空响应）。
//!
//! ## 错误分类
//! - **传输失败**（网络错误、非 2xx 状态）：以 [`BridgeError`] 返回给调用方，绝不 panic
//! - **协议解码失败**（未知事件名、载荷格式错误）：在本层记录日志后丢弃，调用方得到"无事件"
//!
//! ## 两类调用方
//! - 发后即忘：只关心把事件全局分发到会话/证据板/聊天记录
//! - 同步调用（工具状态机）：先拿到原始结果再决定是否全局分发，
//!   `tool_error` 只返回给调用方，不进入全局分发（见 [`BridgeReply`]）

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::models::event::{ClientAction, Envelope, KNOWN_EVENTS, ServerEvent};

/// 传输失败
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BridgeError {
    #[error("网络错误: {0}")]
    Network(String),

    #[error("服务端返回非成功状态: HTTP {0}")]
    Status(u16),

    #[error("响应体解析失败: {0}")]
    Decode(String),
}

/// 传输层抽象
///
/// 生产环境为 [`HttpTransport`]，测试中替换为脚本化的假实现。
/// 返回值是响应体的原始 JSON，事件解码统一由 [`decode_event`] 完成。
pub trait Transport: Send + Sync + 'static {
    fn send(&self, action: &ClientAction)
    -> impl Future<Output = Result<Value, BridgeError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        action: &ClientAction,
    ) -> impl Future<Output = Result<Value, BridgeError>> + Send {
        (**self).send(action)
    }
}

/// 基于 HTTP POST 的传输实现
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// 创建 HTTP 传输
    ///
    /// # 参数
    /// - `endpoint` - 完整的桥接端点 URL（如 `http://127.0.0.1:7860/api/bridge`）
    /// - `timeout` - 单次请求超时
    ///
    /// # 错误
    /// HTTP 客户端构建失败时返回错误
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("创建 HTTP 客户端失败: {}", e))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        action: &ClientAction,
    ) -> impl Future<Output = Result<Value, BridgeError>> + Send {
        // 先构造好请求，返回的 future 不借用 action
        let request = self.client.post(&self.endpoint).json(action);
        let name = action.name();
        async move {
            log::debug!("→ {}", name);
            let response = request
                .send()
                .await
                .map_err(|e| BridgeError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(BridgeError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| BridgeError::Network(e.to_string()))?;
            // 空响应体等价于"无事件"
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            serde_json::from_slice(&body).map_err(|e| BridgeError::Decode(e.to_string()))
        }
    }
}

/// 把响应体解码为入站事件
///
/// # 返回值
/// - `Some(event)` - 已识别且载荷合法的事件
/// - `None` - 空响应、缺少 action、未知事件名或载荷格式错误（后两者记录警告）
pub fn decode_event(body: Value) -> Option<ServerEvent> {
    if body.is_null() {
        return None;
    }

    let envelope: Envelope = match serde_json::from_value(body.clone()) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::warn!("丢弃无法解析的桥接响应: {}", e);
            return None;
        }
    };

    let name = envelope.action?;
    if !KNOWN_EVENTS.contains(&name.as_str()) {
        log::warn!("未知事件，已忽略: {}", name);
        return None;
    }

    match serde_json::from_value::<ServerEvent>(body) {
        Ok(event) => Some(event),
        Err(e) => {
            log::warn!("事件 {} 的载荷格式错误，已丢弃: {}", name, e);
            None
        }
    }
}

/// 同步调用方看到的桥接结果
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeReply {
    /// 正常事件：由调用方决定何时全局分发
    Event(ServerEvent),
    /// 服务端拒绝工具调用：只交给调用方，不做全局分发
    ToolError(String),
    /// 没有可用事件（空响应或被丢弃的响应）
    Nothing,
    /// 传输失败
    Failed(BridgeError),
}

impl BridgeReply {
    /// 对传输结果做解码与分类
    pub fn classify(result: Result<Value, BridgeError>) -> Self {
        match result {
            Err(e) => BridgeReply::Failed(e),
            Ok(body) => match decode_event(body) {
                Some(ServerEvent::ToolError(payload)) => BridgeReply::ToolError(payload.message),
                Some(event) => BridgeReply::Event(event),
                None => BridgeReply::Nothing,
            },
        }
    }
}
