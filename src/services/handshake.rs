//! # 握手服务
//!
//! 客户端启动时立即发送一次 `ready`，之后每隔固定间隔（默认 2 秒）重发，
//! 直到观察到第一个 `init_game` 事件为止；此后定时器被永久取消。
//!
//! 服务端可能在客户端加载后的任意时刻才可用，重复的 `ready` 对服务端而言是幂等的
//! （这是外部约定，客户端不做保证）。

use std::time::Duration;

use crate::services::scheduler::{Scheduler, TimerId, TimerTask};

/// 握手状态
///
/// 同一时刻至多存在一个重试定时器（单飞标志即 `timer`）。
#[derive(Debug, Default)]
pub struct Handshake {
    timer: Option<TimerId>,
    established: bool,
    ready_sent: u32,
}

impl Handshake {
    pub fn new() -> Self {
        Self::default()
    }

    /// 启动握手：返回 true 表示调用方应立即发送一次 `ready`
    ///
    /// 已启动或已建立连接时返回 false，不会登记第二个定时器。
    pub fn start(&mut self, scheduler: &mut Scheduler, now: Duration, interval: Duration) -> bool {
        if self.established || self.timer.is_some() {
            return false;
        }
        self.timer = Some(scheduler.schedule(now, interval, TimerTask::HandshakeRetry));
        self.ready_sent += 1;
        true
    }

    /// 重试定时器触发：返回 true 表示应再发送一次 `ready`，并登记下一次重试
    ///
    /// `fired` 为本次触发的定时器 ID，与当前定时器不一致（过期触发）时忽略。
    pub fn on_retry(
        &mut self,
        scheduler: &mut Scheduler,
        fired: TimerId,
        deadline: Duration,
        interval: Duration,
    ) -> bool {
        if self.established || self.timer != Some(fired) {
            return false;
        }
        // 以上一次的到期时间为基准重排，保持固定节拍而不随处理延迟漂移
        self.timer = Some(scheduler.schedule(deadline, interval, TimerTask::HandshakeRetry));
        self.ready_sent += 1;
        true
    }

    /// 收到 `init_game`：取消重试定时器
    ///
    /// 只有第一次调用真正取消；之后的调用是安全的空操作。返回是否执行了取消。
    pub fn complete(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.established {
            return false;
        }
        self.established = true;
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
            log::info!("与游戏服务端的连接已建立（共发送 ready {} 次）", self.ready_sent);
        }
        true
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    /// 重试定时器是否仍然有效
    pub fn is_retrying(&self, scheduler: &Scheduler) -> bool {
        self.timer.is_some_and(|id| scheduler.is_pending(id))
    }

    pub fn ready_sent(&self) -> u32 {
        self.ready_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(2);

    #[test]
    fn test_start_only_once() {
        let mut scheduler = Scheduler::new();
        let mut handshake = Handshake::new();
        assert!(handshake.start(&mut scheduler, Duration::ZERO, INTERVAL));
        assert!(!handshake.start(&mut scheduler, Duration::ZERO, INTERVAL));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_complete_cancels_exactly_once() {
        let mut scheduler = Scheduler::new();
        let mut handshake = Handshake::new();
        handshake.start(&mut scheduler, Duration::ZERO, INTERVAL);
        assert!(handshake.is_retrying(&scheduler));

        assert!(handshake.complete(&mut scheduler));
        assert!(!handshake.complete(&mut scheduler));
        assert!(!handshake.is_retrying(&scheduler));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_stale_retry_is_ignored() {
        let mut scheduler = Scheduler::new();
        let mut handshake = Handshake::new();
        handshake.start(&mut scheduler, Duration::ZERO, INTERVAL);
        let (id, deadline, _) = scheduler.pop_due(INTERVAL).unwrap();
        handshake.complete(&mut scheduler);
        assert!(!handshake.on_retry(&mut scheduler, id, deadline, INTERVAL));
        assert_eq!(handshake.ready_sent(), 1);
    }
}
