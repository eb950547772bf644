//! # 逻辑定时器服务
//!
//! 引擎中所有"延时/周期"行为都通过逻辑定时器实现，而不是嵌套的异步 sleep：
//! - 握手重试（每 2 秒一次，收到 `init_game` 后取消）
//! - 嫌疑人消息逐字显示（每条消息一个自我重排的定时器）
//! - 工具结果自动关闭（5 秒）
//!
//! 时间用"自客户端启动以来的 `Duration`"表示，由调用方传入。
//! 运行时传入真实的流逝时间，测试直接传入任意时间点即可确定性地推进。
//!
//! ## 取消语义
//! [`TimerId`] 即取消令牌；对同一个 ID 重复取消是安全的空操作。

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// 定时器 ID（取消令牌）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// 定时任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// 握手重试：再发一次 `ready`
    HandshakeRetry,
    /// 聊天记录第 `message` 条消息再显示一个字符
    RevealChar { message: usize },
    /// 关闭代号为 `generation` 的工具会话（仅当它仍处于结果状态）
    ToolAutoClose { generation: u64 },
}

/// 逻辑定时器
///
/// 以 `(到期时间, ID)` 为键排序，同一时刻到期的任务按登记顺序触发。
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BTreeMap<(Duration, TimerId), TimerTask>,
    deadlines: HashMap<TimerId, Duration>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个在 `now + delay` 到期的任务
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = now + delay;
        self.queue.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    /// 取消任务；任务不存在（已触发或已取消）时返回 false
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.queue.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// 最早的到期时间，供运行时决定睡眠多久
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// 弹出最早一个已到期（到期时间 <= now）的任务
    ///
    /// 逐个弹出而不是一次性取出全部：任务处理过程中可能取消其他任务，
    /// 逐个弹出保证被取消的任务不会再触发。
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, Duration, TimerTask)> {
        let (&(deadline, id), _) = self.queue.iter().next()?;
        if deadline > now {
            return None;
        }
        let task = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        Some((id, deadline, task))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(0), ms(50), TimerTask::RevealChar { message: 2 });
        s.schedule(ms(0), ms(10), TimerTask::RevealChar { message: 1 });
        s.schedule(ms(0), ms(2000), TimerTask::HandshakeRetry);

        assert_eq!(s.next_deadline(), Some(ms(10)));
        let (_, _, first) = s.pop_due(ms(100)).unwrap();
        let (_, _, second) = s.pop_due(ms(100)).unwrap();
        assert_eq!(first, TimerTask::RevealChar { message: 1 });
        assert_eq!(second, TimerTask::RevealChar { message: 2 });
        // 握手重试尚未到期
        assert!(s.pop_due(ms(100)).is_none());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut s = Scheduler::new();
        let id = s.schedule(ms(0), ms(2000), TimerTask::HandshakeRetry);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(!s.is_pending(id));
        assert!(s.pop_due(ms(10_000)).is_none());
    }
}
