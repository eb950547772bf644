//! # 异步运行时
//!
//! 驱动 [`GameClient`] 的异步外壳。单个任务独占客户端状态，在三类输入之间轮转：
//! - 桥接响应：在途请求跑在 `JoinSet` 上，完成后作为一个回合交回客户端
//! - 用户命令：经 mpsc 通道到达
//! - 定时器：睡眠到调度器的下一个到期时间
//!
//! 桥接请求只挂起它自己的任务，等待期间其他回合照常进行。

use std::future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};

use crate::models::display::UiEvent;
use crate::models::tool::ToolName;
use crate::services::bridge::{BridgeError, Transport};
use crate::services::client::{GameClient, Request};

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Select(String),
    Say(String),
    OpenTool(ToolName),
    SetField { name: String, value: String },
    Submit,
    Close,
    Show(View),
    Quit,
}

/// 只读视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
    Status,
    Help,
}

/// 呈现层接口
pub trait Presenter {
    /// 呈现一个回合产生的显示事件
    fn present(&mut self, client: &GameClient, events: Vec<UiEvent>);

    /// 按需呈现某个只读视图
    fn show(&mut self, client: &GameClient, view: View);
}

/// 运行时
pub struct Runtime<T: Transport> {
    client: GameClient,
    transport: Arc<T>,
    started: Instant,
    in_flight: JoinSet<(Request, Result<Value, BridgeError>)>,
}

impl<T: Transport> Runtime<T> {
    pub fn new(client: GameClient, transport: Arc<T>) -> Self {
        Self {
            client,
            transport,
            started: Instant::now(),
            in_flight: JoinSet::new(),
        }
    }

    pub fn client(&self) -> &GameClient {
        &self.client
    }

    /// 自启动以来的逻辑时间
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn spawn(&mut self, requests: Vec<Request>) {
        for request in requests {
            let transport = Arc::clone(&self.transport);
            self.in_flight.spawn(async move {
                let result = transport.send(request.action()).await;
                (request, result)
            });
        }
    }

    /// 处理一条用户命令，返回 false 表示退出
    fn handle<P: Presenter>(&mut self, command: UserCommand, presenter: &mut P) -> bool {
        let now = self.now();
        let requests = match command {
            UserCommand::Select(id) => self.client.select_suspect(now, &id),
            UserCommand::Say(text) => self.client.send_chat(now, &text),
            UserCommand::OpenTool(tool) => {
                self.client.open_tool(tool);
                Vec::new()
            }
            UserCommand::SetField { name, value } => {
                // 拒绝原因已作为提示排入发件箱
                let _ = self.client.set_tool_field(&name, &value);
                Vec::new()
            }
            UserCommand::Submit => self.client.submit_tool(),
            UserCommand::Close => {
                self.client.close_tool();
                Vec::new()
            }
            UserCommand::Show(view) => {
                presenter.show(&self.client, view);
                Vec::new()
            }
            UserCommand::Quit => return false,
        };
        self.spawn(requests);
        true
    }

    /// 主循环：直到收到 `Quit` 或命令通道关闭
    ///
    /// # 返回值
    /// 退出时的客户端状态与呈现器（便于调用方检查最终状态）
    pub async fn run<P: Presenter>(
        mut self,
        mut commands: mpsc::Receiver<UserCommand>,
        mut presenter: P,
    ) -> (GameClient, P) {
        let requests = self.client.start(self.now());
        self.spawn(requests);
        let events = self.client.drain_ui_events();
        presenter.present(&self.client, events);

        loop {
            let deadline = self.client.next_deadline().map(|d| self.started + d);
            let timer = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => future::pending::<()>().await,
                }
            };

            tokio::select! {
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    let now = self.now();
                    match joined {
                        Ok((Request::Dispatch(_), result)) => self.client.on_response(now, result),
                        Ok((Request::Tool { generation, .. }, result)) => {
                            self.client.on_tool_response(now, generation, result)
                        }
                        Err(e) => log::error!("桥接任务异常退出: {}", e),
                    }
                }
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command, &mut presenter) {
                            break;
                        }
                    }
                    None => break,
                },
                _ = timer => {
                    let requests = self.client.tick(self.now());
                    self.spawn(requests);
                }
            }

            let events = self.client.drain_ui_events();
            presenter.present(&self.client, events);
        }

        self.in_flight.abort_all();
        log::info!("客户端退出");
        (self.client, presenter)
    }
}
