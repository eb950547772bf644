//! # 工具交互状态机
//!
//! 管理"一次工具调用"的完整生命周期：
//!
//! ```text
//! Idle → Collecting → Submitting → Result | Error → Idle（关闭）
//!            ↑                          │
//!            └──────── 修改字段 ─────────┘ (仅 Error)
//! ```
//!
//! ## 规则
//! - 同一时刻至多一个活动会话；打开新工具会丢弃旧会话
//! - 前置条件不满足时 `open` 直接返回提示信息，不进入 `Collecting`
//! - 本地校验失败停留在 `Collecting` 并记录字段错误，不访问服务端
//! - `Submitting` 期间拒绝再次提交
//! - `tool_error` → `Error`（可修改后重新提交），不做全局分发
//! - 正常事件 → `Result`，事件交还给调用方做全局分发，并由调用方登记自动关闭
//!
//! 每次 `open` 分配新的会话代号（generation）。响应到达时代号不一致说明会话已被关闭或替换：
//! 成功事件仍然全局分发（服务端已经生效），但不会触碰新会话。

use thiserror::Error;

use crate::models::event::{ClientAction, ServerEvent, ToolRequest};
use crate::models::session::Session;
use crate::models::tool::{
    ACCUSE_CONFIRMATION_TOKEN, FieldKind, ToolField, ToolName, ToolSession, ToolStatus,
};
use crate::services::bridge::BridgeReply;
use crate::services::tool_format::summarize;

/// 传输失败时展示给玩家的通用错误
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Could not reach the server. Please try again.";

/// 服务端没有返回可用结果时的通用错误
pub const EMPTY_RESULT_MESSAGE: &str = "The server returned no result. Please try again.";

/// 本地字段校验失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("'{value}' is not a valid {field}")]
    NotAnOption { field: &'static str, value: String },

    #[error("Type GUILTY to confirm the accusation")]
    Confirmation,

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// 编辑或提交被拒绝
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("No tool is open")]
    NoSession,

    #[error("A request is already in progress")]
    InFlight,

    #[error("This tool has already returned a result")]
    Finished,

    #[error(transparent)]
    Invalid(#[from] FieldError),
}

/// 一次响应的处理结果
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// 需要全局分发的事件
    pub dispatch: Option<ServerEvent>,
    /// 是否更新了当前活动会话（过期响应为 false）
    pub applied: bool,
}

/// 工具状态机
#[derive(Debug, Default)]
pub struct ToolMachine {
    active: Option<ToolSession>,
    generation: u64,
}

impl ToolMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ToolSession> {
        self.active.as_ref()
    }

    /// 当前状态；没有活动会话时为 `Idle`
    pub fn status(&self) -> ToolStatus {
        self.active
            .as_ref()
            .map(|s| s.status.clone())
            .unwrap_or(ToolStatus::Idle)
    }

    /// 打开工具
    ///
    /// # 参数
    /// - `tool` - 要打开的工具
    /// - `session` - 当前会话快照，用于前置条件检查和构造下拉选项
    ///
    /// # 错误
    /// 前置条件不满足时返回提示信息，此时不存在活动会话
    pub fn open(&mut self, tool: ToolName, session: Option<&Session>) -> Result<&ToolSession, String> {
        self.active = None;

        let session = session.ok_or_else(|| "The case file has not loaded yet.".to_string())?;
        if session.is_over() {
            return Err("The case is closed.".to_string());
        }

        let target_suspect_id = match tool {
            ToolName::GetDnaTest if session.unlocked_evidence_ids.is_empty() => {
                return Err("No evidence available for DNA testing yet.".to_string());
            }
            ToolName::Accuse => match &session.current_suspect_id {
                Some(id) => Some(id.clone()),
                None => return Err("Select a suspect first!".to_string()),
            },
            _ => None,
        };

        self.generation += 1;
        let opened = self.active.insert(ToolSession {
            tool,
            fields: build_fields(tool, session),
            status: ToolStatus::Collecting { field_error: None },
            generation: self.generation,
            target_suspect_id,
        });
        log::debug!("打开工具 {}（代号 {}）", tool, opened.generation);
        Ok(&*opened)
    }

    /// 修改字段值
    ///
    /// `Error` 状态下修改字段会回到 `Collecting`；`Collecting` 状态下清除上一次的字段错误。
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), SubmitRejection> {
        let active = self.active.as_mut().ok_or(SubmitRejection::NoSession)?;
        match active.status {
            ToolStatus::Submitting => return Err(SubmitRejection::InFlight),
            ToolStatus::Result { .. } => return Err(SubmitRejection::Finished),
            _ => {}
        }

        let field = active
            .field_mut(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        field.value = value.to_string();
        active.status = ToolStatus::Collecting { field_error: None };
        Ok(())
    }

    /// 提交当前会话
    ///
    /// # 返回值
    /// 成功时返回 `(会话代号, 待发送的动作)`，会话进入 `Submitting`
    ///
    /// # 错误
    /// - 没有活动会话 / 正在提交 / 已有结果
    /// - 字段校验失败（会话停留在 `Collecting` 并记录字段错误）
    pub fn submit(&mut self) -> Result<(u64, ClientAction), SubmitRejection> {
        let active = self.active.as_mut().ok_or(SubmitRejection::NoSession)?;
        match active.status {
            ToolStatus::Submitting => return Err(SubmitRejection::InFlight),
            ToolStatus::Result { .. } => return Err(SubmitRejection::Finished),
            _ => {}
        }

        if let Err(e) = validate(active) {
            active.status = ToolStatus::Collecting {
                field_error: Some(e.to_string()),
            };
            return Err(e.into());
        }

        let mut args = active.values();
        if active.tool == ToolName::Accuse {
            args.remove("confirmation");
            if let Some(id) = &active.target_suspect_id {
                args.insert("suspect_id".to_string(), id.clone());
            }
        }

        active.status = ToolStatus::Submitting;
        let action = ClientAction::UseTool(ToolRequest {
            tool: active.tool.as_str().to_string(),
            args,
        });
        Ok((active.generation, action))
    }

    /// 处理桥接响应
    ///
    /// # 参数
    /// - `generation` - 提交时拿到的会话代号
    /// - `reply` - 分类后的桥接结果
    pub fn resolve(&mut self, generation: u64, reply: BridgeReply) -> Resolution {
        let current = self
            .active
            .as_mut()
            .filter(|s| s.generation == generation && s.status == ToolStatus::Submitting);

        let Some(active) = current else {
            // 会话已关闭或被替换：只保留成功事件的全局分发
            let dispatch = match reply {
                BridgeReply::Event(event) => {
                    log::debug!("工具响应到达时会话已失效（代号 {}），仅做全局分发", generation);
                    Some(event)
                }
                _ => None,
            };
            return Resolution {
                dispatch,
                applied: false,
            };
        };

        let (status, dispatch) = match reply {
            BridgeReply::Event(event) => (
                ToolStatus::Result {
                    summary: summarize(active.tool, &event),
                },
                Some(event),
            ),
            BridgeReply::ToolError(message) => (ToolStatus::Error { message }, None),
            BridgeReply::Nothing => (
                ToolStatus::Error {
                    message: EMPTY_RESULT_MESSAGE.to_string(),
                },
                None,
            ),
            BridgeReply::Failed(e) => {
                log::error!("工具 {} 调用失败: {}", active.tool, e);
                (
                    ToolStatus::Error {
                        message: TRANSPORT_FAILURE_MESSAGE.to_string(),
                    },
                    None,
                )
            }
        };
        active.status = status;

        Resolution {
            dispatch,
            applied: true,
        }
    }

    /// 关闭当前会话（任意状态），返回是否存在被关闭的会话
    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// 嫌疑人被排除：关闭仍指向该嫌疑人、尚未提交的 accuse 会话
    ///
    /// 在途或已有结果的会话保持不动，结果由响应本身决定。
    pub fn withdraw_accusation(&mut self, suspect_id: &str) -> bool {
        let stale = self.active.as_ref().is_some_and(|s| {
            s.tool == ToolName::Accuse
                && s.target_suspect_id.as_deref() == Some(suspect_id)
                && matches!(s.status, ToolStatus::Collecting { .. } | ToolStatus::Error { .. })
        });
        if stale {
            log::info!("嫌疑人 {} 已被排除，撤回未提交的指控", suspect_id);
            self.active = None;
        }
        stale
    }

    /// 自动关闭：仅当代号匹配且仍处于 `Result` 状态时关闭
    pub fn auto_close(&mut self, generation: u64) -> bool {
        let due = self.active.as_ref().is_some_and(|s| {
            s.generation == generation && matches!(s.status, ToolStatus::Result { .. })
        });
        if due {
            self.active = None;
        }
        due
    }
}

/// 按工具构造表单字段
fn build_fields(tool: ToolName, session: &Session) -> Vec<ToolField> {
    match tool {
        ToolName::GetLocation => vec![text_field("phone_number", "")],
        ToolName::GetFootage => {
            let options = session
                .available_camera_ids
                .iter()
                .map(|id| (id.clone(), id.clone()))
                .collect();
            vec![select_field("camera_id", options)]
        }
        ToolName::GetDnaTest => {
            let options = session
                .unlocked_evidence_ids
                .iter()
                .map(|id| (id.clone(), session.dna_label(id).to_string()))
                .collect();
            vec![select_field("evidence_id", options)]
        }
        ToolName::CallAlibi => {
            let alibi = session
                .current_suspect()
                .and_then(|s| s.alibi_id.clone())
                .unwrap_or_default();
            vec![text_field("alibi_id", &alibi), text_field("question", "")]
        }
        ToolName::Accuse => vec![text_field("confirmation", "")],
    }
}

fn text_field(name: &'static str, value: &str) -> ToolField {
    ToolField {
        name,
        kind: FieldKind::Text,
        value: value.to_string(),
    }
}

/// 下拉字段：预填第一个选项
fn select_field(name: &'static str, options: Vec<(String, String)>) -> ToolField {
    let value = options.first().map(|(v, _)| v.clone()).unwrap_or_default();
    ToolField {
        name,
        kind: FieldKind::Select(options),
        value,
    }
}

/// 本地字段校验
fn validate(session: &ToolSession) -> Result<(), FieldError> {
    for field in &session.fields {
        let value = field.value.trim();
        if value.is_empty() {
            return Err(FieldError::Required(field.name));
        }
        if let FieldKind::Select(options) = &field.kind {
            if !options.iter().any(|(v, _)| v == value) {
                return Err(FieldError::NotAnOption {
                    field: field.name,
                    value: value.to_string(),
                });
            }
        }
    }

    if session.tool == ToolName::Accuse {
        let confirmed = session
            .field("confirmation")
            .is_some_and(|f| f.value.trim().eq_ignore_ascii_case(ACCUSE_CONFIRMATION_TOKEN));
        if !confirmed {
            return Err(FieldError::Confirmation);
        }
    }
    Ok(())
}
