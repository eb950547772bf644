//! # 桥接协议数据模型
//!
//! 客户端与游戏服务端之间只有一种报文形状：`{ "action": string, "data": object }`。
//! - 出站（客户端 → 服务端）：[`ClientAction`]，共 4 种动作
//! - 入站（服务端 → 客户端）：[`ServerEvent`]，共 7 种事件
//!
//! 两个枚举都使用 serde 的相邻标签（adjacently tagged）表示，`action` 为标签，
//! `data` 为载荷。未知事件名不会进入 [`ServerEvent`]，由桥接层记录日志后丢弃。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::evidence::EvidenceFragment;
use crate::models::scenario::Scenario;

/// 入站事件名列表
///
/// 桥接层先比对事件名：不在列表中的按"未知事件"处理，
/// 在列表中但载荷解析失败的按"协议解码失败"处理，两者都只记录日志。
pub const KNOWN_EVENTS: &[&str] = &[
    "init_game",
    "update_chat",
    "add_evidence",
    "tool_error",
    "update_status",
    "round_failure",
    "game_over",
];

/// 出站动作
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum ClientAction {
    /// 握手：空载荷 `{}`，在收到 `init_game` 之前周期性发送
    Ready {},
    /// 选择嫌疑人
    SelectSuspect { suspect_id: String },
    /// 向当前嫌疑人发送问话
    ChatMessage { suspect_id: String, message: String },
    /// 使用调查工具
    UseTool(ToolRequest),
}

impl ClientAction {
    /// 线上动作名，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            ClientAction::Ready {} => "ready",
            ClientAction::SelectSuspect { .. } => "select_suspect",
            ClientAction::ChatMessage { .. } => "chat_message",
            ClientAction::UseTool(_) => "use_tool",
        }
    }
}

/// 工具请求载荷
///
/// 各工具字段被展平到 `data` 中，例如：
/// `{ "tool": "call_alibi", "alibi_id": "ALIBI-101", "question": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolRequest {
    pub tool: String,
    #[serde(flatten)]
    pub args: BTreeMap<String, String>,
}

/// 入站事件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    InitGame(InitGamePayload),
    UpdateChat(ChatPayload),
    AddEvidence(EvidenceFragment),
    ToolError(ToolErrorPayload),
    UpdateStatus(StatusPayload),
    RoundFailure(RoundFailurePayload),
    GameOver(GameOverPayload),
}

impl ServerEvent {
    /// 线上事件名，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::InitGame(_) => "init_game",
            ServerEvent::UpdateChat(_) => "update_chat",
            ServerEvent::AddEvidence(_) => "add_evidence",
            ServerEvent::ToolError(_) => "tool_error",
            ServerEvent::UpdateStatus(_) => "update_status",
            ServerEvent::RoundFailure(_) => "round_failure",
            ServerEvent::GameOver(_) => "game_over",
        }
    }
}

/// `init_game` 载荷：会话的初始快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitGamePayload {
    pub round: u32,
    pub points: i64,
    pub scenario: Scenario,
    #[serde(default, alias = "unlockedEvidence")]
    pub unlocked_evidence: Vec<String>,
    #[serde(default, alias = "availableCameras")]
    pub available_cameras: Vec<String>,
    /// DNA 证物 ID → 显示标签
    #[serde(default, alias = "dnaMap")]
    pub dna_map: BTreeMap<String, String>,
    /// 总轮数（可以错误指控的次数）
    #[serde(default, alias = "maxRounds")]
    pub max_rounds: Option<u32>,
}

/// `update_chat` 载荷
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatPayload {
    /// "system" | "user" | "detective" | "assistant" | "suspect"
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `tool_error` 载荷：服务端拒绝了一次工具调用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolErrorPayload {
    #[serde(alias = "error")]
    pub message: String,
}

/// `update_status` 载荷：所有字段可选，出现即覆盖
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusPayload {
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub eliminated_id: Option<String>,
    #[serde(default)]
    pub unlocked_evidence: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `round_failure` 载荷：错误指控，进入下一轮
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundFailurePayload {
    pub message: String,
    #[serde(default)]
    pub eliminated_id: Option<String>,
    #[serde(default)]
    pub new_round: Option<u32>,
    #[serde(default)]
    pub new_points: Option<i64>,
}

/// `game_over` 载荷
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameOverPayload {
    /// "win" | "loss"
    pub result: String,
    pub message: String,
}

impl GameOverPayload {
    pub fn is_win(&self) -> bool {
        self.result.eq_ignore_ascii_case("win")
    }
}

/// 桥接响应外壳
///
/// 先按外壳解析，再根据事件名决定是否进一步解析为 [`ServerEvent`]。
/// `action` 缺失（如服务端返回 `{}`）表示本次请求没有事件。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Value,
}
