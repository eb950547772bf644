//! # 聊天记录服务
//!
//! 只追加的消息日志，顺序即到达顺序。
//!
//! - 系统消息与侦探消息追加后立即完整显示
//! - 嫌疑人消息逐字显示：每条消息拥有自己的定时器，每显示一个字符就以上一次到期时间为基准
//!   重排下一次，直到整条消息显示完毕
//!
//! 每次追加与每个新显示的字符都会请求一次"滚动到底部"。
//! 逐字显示不会阻塞其他消息：多条嫌疑人消息可以同时处于显示过程中。

use std::time::Duration;

use crate::models::chat::ChatMessage;
use crate::models::display::UiEvent;
use crate::services::scheduler::{Scheduler, TimerId, TimerTask};

/// 日志中的一条消息及其显示进度
#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub message: ChatMessage,
    /// 已显示的字符数（按 Unicode 标量计）
    pub visible_chars: usize,
    total_chars: usize,
    timer: Option<TimerId>,
}

impl ChatEntry {
    pub fn is_complete(&self) -> bool {
        self.visible_chars >= self.total_chars
    }

    /// 当前可见的文本前缀
    pub fn visible_text(&self) -> &str {
        match self.message.text.char_indices().nth(self.visible_chars) {
            Some((end, _)) => &self.message.text[..end],
            None => &self.message.text,
        }
    }
}

/// 聊天记录
#[derive(Debug, Default)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ChatEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加一条消息，返回其在日志中的位置
    ///
    /// # 参数
    /// - `now` - 当前逻辑时间，逐字显示的第一个字符在 `now + interval` 出现
    /// - `interval` - 逐字显示间隔
    /// - `outbox` - 显示层事件发件箱
    pub fn append(
        &mut self,
        message: ChatMessage,
        scheduler: &mut Scheduler,
        now: Duration,
        interval: Duration,
        outbox: &mut Vec<UiEvent>,
    ) -> usize {
        let index = self.entries.len();
        let total_chars = message.text.chars().count();
        let typed = message.role.is_typed() && total_chars > 0;

        let timer = typed.then(|| scheduler.schedule(now, interval, TimerTask::RevealChar { message: index }));
        self.entries.push(ChatEntry {
            message,
            visible_chars: if typed { 0 } else { total_chars },
            total_chars,
            timer,
        });

        outbox.push(UiEvent::ChatAppended { index });
        outbox.push(UiEvent::ScrollToBottom);
        index
    }

    /// 逐字显示定时器触发：再显示一个字符
    ///
    /// `fired` 与该消息当前的定时器不一致（过期触发）时忽略。
    pub fn on_reveal(
        &mut self,
        index: usize,
        fired: TimerId,
        deadline: Duration,
        scheduler: &mut Scheduler,
        interval: Duration,
        outbox: &mut Vec<UiEvent>,
    ) {
        let Some(entry) = self.entries.get_mut(index) else {
            log::warn!("逐字显示定时器指向不存在的消息: {}", index);
            return;
        };
        if entry.timer != Some(fired) {
            return;
        }

        entry.visible_chars += 1;
        let complete = entry.is_complete();
        entry.timer = if complete {
            None
        } else {
            Some(scheduler.schedule(deadline, interval, TimerTask::RevealChar { message: index }))
        };

        outbox.push(UiEvent::ChatRevealed {
            index,
            visible_chars: entry.visible_chars,
            complete,
        });
        outbox.push(UiEvent::ScrollToBottom);
    }

    /// 是否有消息仍在逐字显示
    pub fn is_revealing(&self) -> bool {
        self.entries.iter().any(|e| !e.is_complete())
    }
}
