//! # 显示层事件模型
//!
//! 引擎本身不做任何渲染，每个回合结束后把需要呈现的变化以 [`UiEvent`] 的形式排入发件箱，
//! 由前端（终端呈现器或其他界面）自行取走并绘制。
//!
//! ## 设计原则
//! - **只描述变化**：事件携带索引/键，前端按需回查 `GameClient` 的只读视图
//! - **顺序即到达顺序**：发件箱严格 FIFO，与状态修改顺序一致

use serde::Serialize;

use crate::models::evidence::BoardMutation;
use crate::models::tool::{ToolName, ToolStatus};

/// 显示层事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UiEvent {
    /// 会话建立（加载遮罩可以撤下）
    SessionStarted { title: String },
    /// 轮数/点数变化
    StatusChanged { round: u32, points: i64 },
    /// 新消息追加到聊天记录；`index` 为记录中的位置
    ChatAppended { index: usize },
    /// 逐字显示推进了一个字符
    ChatRevealed {
        index: usize,
        visible_chars: usize,
        complete: bool,
    },
    /// 聊天视图滚动到底部
    ScrollToBottom,
    /// 证据板变化
    Board(BoardMutation),
    /// 新解锁的证物（独立于证据板变化的通知）
    EvidenceUnlocked { ids: Vec<String> },
    /// 瞬时提示（前置条件不满足等）
    Notification { message: String },
    /// 当前选择的嫌疑人变化
    SuspectSelected { suspect_id: String },
    /// 当前选择因嫌疑人被排除而清空
    SelectionCleared { suspect_id: String },
    /// 嫌疑人被排除
    SuspectEliminated { suspect_id: String },
    /// 工具会话状态变化；`tool` 为 None 表示回到空闲
    ToolChanged {
        tool: Option<ToolName>,
        status: ToolStatus,
    },
    /// 对局结束
    GameOver { won: bool, message: String },
}
