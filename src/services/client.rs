//! # 游戏客户端（状态归约核心）
//!
//! [`GameClient`] 是客户端唯一持有的状态对象，组合了：
//! - 会话存储（[`SessionStore`]）
//! - 证据板（[`EvidenceBoard`]）
//! - 聊天记录（[`ChatLog`]）
//! - 工具状态机（[`ToolMachine`]）
//! - 握手（[`Handshake`]）与逻辑定时器（[`Scheduler`]）
//!
//! ## 回合模型
//! 所有入口都是同步的归约函数，对应一个离散回合（用户输入、定时器到期、桥接响应）。
//! 归约函数不做任何 I/O：需要发送的动作以 [`Request`] 返回给运行时，
//! 需要呈现的变化排入发件箱，由前端通过 [`GameClient::drain_ui_events`] 取走。
//!
//! 时间由调用方以"自启动以来的 `Duration`"传入，因此整个核心可以在测试中确定性地推进。

use std::time::Duration;

use serde_json::Value;

use crate::models::chat::ChatMessage;
use crate::models::display::UiEvent;
use crate::models::event::{ClientAction, ServerEvent};
use crate::models::scenario::PortraitDescriptor;
use crate::models::session::Session;
use crate::models::settings::Timings;
use crate::models::tool::{ToolName, ToolSession, ToolStatus};
use crate::services::board::{EvidenceBoard, case_file_fragment};
use crate::services::bridge::{BridgeError, BridgeReply};
use crate::services::chat::ChatLog;
use crate::services::handshake::Handshake;
use crate::services::portraits::resolve_portrait;
use crate::services::scheduler::{Scheduler, TimerTask};
use crate::services::session_store::SessionStore;
use crate::services::tool_machine::{SubmitRejection, ToolMachine};

/// 需要运行时发送的桥接请求
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// 发后即忘：响应交回 [`GameClient::on_response`] 做全局分发
    Dispatch(ClientAction),
    /// 工具调用：响应交回 [`GameClient::on_tool_response`]
    Tool { generation: u64, action: ClientAction },
}

impl Request {
    pub fn action(&self) -> &ClientAction {
        match self {
            Request::Dispatch(action) | Request::Tool { action, .. } => action,
        }
    }
}

/// 游戏客户端
#[derive(Debug)]
pub struct GameClient {
    timings: Timings,
    scheduler: Scheduler,
    handshake: Handshake,
    store: SessionStore,
    board: EvidenceBoard,
    chat: ChatLog,
    tools: ToolMachine,
    /// 启动时加载的头像目录，会话建立时移交给会话
    catalog: Vec<PortraitDescriptor>,
    outbox: Vec<UiEvent>,
}

impl GameClient {
    pub fn new(timings: Timings, catalog: Vec<PortraitDescriptor>) -> Self {
        Self {
            timings: timings.clamped(),
            scheduler: Scheduler::new(),
            handshake: Handshake::new(),
            store: SessionStore::new(),
            board: EvidenceBoard::new(),
            chat: ChatLog::new(),
            tools: ToolMachine::new(),
            catalog,
            outbox: Vec::new(),
        }
    }

    // ========== 只读视图 ==========

    pub fn session(&self) -> Option<&Session> {
        self.store.session()
    }

    pub fn board(&self) -> &EvidenceBoard {
        &self.board
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn tool(&self) -> Option<&ToolSession> {
        self.tools.active()
    }

    pub fn tool_status(&self) -> ToolStatus {
        self.tools.status()
    }

    pub fn is_connected(&self) -> bool {
        self.handshake.is_established()
    }

    /// 下一个定时器的到期时间
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// 嫌疑人的头像资源 ID；会话未建立或嫌疑人不存在时为 None
    pub fn portrait_for(&self, suspect_id: &str) -> Option<String> {
        let session = self.store.session()?;
        let index = session.scenario.suspect_index(suspect_id)?;
        let suspect = &session.scenario.suspects[index];
        Some(resolve_portrait(suspect, index, &session.portrait_catalog))
    }

    /// 取走发件箱中的全部显示事件
    pub fn drain_ui_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ========== 定时器与握手 ==========

    /// 启动客户端：立即发送一次 `ready` 并登记重试
    pub fn start(&mut self, now: Duration) -> Vec<Request> {
        if self.handshake.start(&mut self.scheduler, now, self.timings.handshake_interval) {
            log::info!("开始与游戏服务端握手");
            vec![Request::Dispatch(ClientAction::Ready {})]
        } else {
            Vec::new()
        }
    }

    /// 推进逻辑时间，处理所有已到期的定时器
    pub fn tick(&mut self, now: Duration) -> Vec<Request> {
        let mut requests = Vec::new();
        while let Some((id, deadline, task)) = self.scheduler.pop_due(now) {
            match task {
                TimerTask::HandshakeRetry => {
                    if self.handshake.on_retry(&mut self.scheduler, id, deadline, self.timings.handshake_interval) {
                        log::debug!("握手重试（第 {} 次 ready）", self.handshake.ready_sent());
                        requests.push(Request::Dispatch(ClientAction::Ready {}));
                    }
                }
                TimerTask::RevealChar { message } => {
                    self.chat.on_reveal(
                        message,
                        id,
                        deadline,
                        &mut self.scheduler,
                        self.timings.typing_interval,
                        &mut self.outbox,
                    );
                }
                TimerTask::ToolAutoClose { generation } => {
                    if self.tools.auto_close(generation) {
                        self.emit_tool_changed();
                    }
                }
            }
        }
        requests
    }

    // ========== 桥接响应 ==========

    /// 发后即忘请求的响应：解码后全局分发
    pub fn on_response(&mut self, now: Duration, result: Result<Value, BridgeError>) {
        match BridgeReply::classify(result) {
            BridgeReply::Event(event) => self.dispatch(now, event),
            BridgeReply::ToolError(message) => self.notify(message),
            BridgeReply::Nothing => {}
            BridgeReply::Failed(e) => log::error!("桥接请求失败: {}", e),
        }
    }

    /// 工具请求的响应：先交给工具状态机，成功事件再全局分发
    pub fn on_tool_response(&mut self, now: Duration, generation: u64, result: Result<Value, BridgeError>) {
        let resolution = self.tools.resolve(generation, BridgeReply::classify(result));
        if resolution.applied {
            if matches!(self.tools.status(), ToolStatus::Result { .. }) {
                self.scheduler.schedule(
                    now,
                    self.timings.result_close_delay,
                    TimerTask::ToolAutoClose { generation },
                );
            }
            self.emit_tool_changed();
        }
        if let Some(event) = resolution.dispatch {
            self.dispatch(now, event);
        }
    }

    /// 全局分发一个入站事件
    pub fn dispatch(&mut self, now: Duration, event: ServerEvent) {
        log::debug!("← {}", event.name());
        match event {
            ServerEvent::InitGame(payload) => {
                // 无论是否重复，收到 init_game 都意味着握手完成
                self.handshake.complete(&mut self.scheduler);
                let catalog = std::mem::take(&mut self.catalog);
                let Some(session) = self.store.init(payload, catalog) else {
                    return;
                };
                let title = session.scenario.title.clone();
                let victim = session.scenario.victim.clone();
                let (round, points) = (session.round, session.points);

                self.outbox.push(UiEvent::SessionStarted { title: title.clone() });
                self.outbox.push(UiEvent::StatusChanged { round, points });

                let outcome = self.board.ingest(case_file_fragment(&title, &victim), None);
                self.outbox.push(UiEvent::Board(outcome.mutation));

                self.post_system(now, format!("CASE LOADED: {}", title));
                self.post_system(now, format!("VICTIM: {}", victim.name));
            }
            ServerEvent::UpdateChat(payload) => {
                let message = ChatMessage::new(&payload.role, payload.content, payload.name.as_deref());
                self.append_chat(now, message);
            }
            ServerEvent::AddEvidence(fragment) => {
                let outcome = self.board.ingest(fragment, self.store.session_mut());
                self.outbox.push(UiEvent::Board(outcome.mutation));
                if !outcome.unlocked.is_empty() {
                    self.outbox.push(UiEvent::EvidenceUnlocked { ids: outcome.unlocked });
                }
                if outcome.points_updated {
                    self.emit_status();
                }
            }
            ServerEvent::ToolError(payload) => self.notify(payload.message),
            ServerEvent::UpdateStatus(payload) => {
                let message = payload.message.clone();
                let eliminated_id = payload.eliminated_id.clone();
                let change = self.store.apply_status(payload);
                if change.counters_changed {
                    self.emit_status();
                }
                if let Some(id) = eliminated_id {
                    self.after_elimination(id, change.eliminated.is_some(), change.selection_cleared);
                }
                if !change.unlocked.is_empty() {
                    self.outbox.push(UiEvent::EvidenceUnlocked { ids: change.unlocked });
                }
                if let Some(message) = message {
                    self.post_system(now, message);
                }
            }
            ServerEvent::RoundFailure(payload) => {
                let change = self.store.apply_round_failure(&payload);
                if let Some(id) = payload.eliminated_id {
                    self.after_elimination(id, change.eliminated.is_some(), change.selection_cleared);
                }
                self.emit_status();
                self.post_system(now, payload.message);
            }
            ServerEvent::GameOver(payload) => {
                let outcome = self.store.apply_game_over(payload);
                self.post_system(now, outcome.message.clone());
                self.outbox.push(UiEvent::GameOver {
                    won: outcome.won,
                    message: outcome.message,
                });
            }
        }
    }

    // ========== 用户操作 ==========

    /// 选择嫌疑人：本地更新选择并转发给服务端
    pub fn select_suspect(&mut self, now: Duration, suspect_id: &str) -> Vec<Request> {
        let name = match self.store.select(suspect_id).map(|s| s.name.clone()) {
            Ok(name) => name,
            Err(message) => {
                self.notify(message);
                return Vec::new();
            }
        };

        self.outbox.push(UiEvent::SuspectSelected {
            suspect_id: suspect_id.to_string(),
        });
        self.post_system(now, format!("Selected suspect: {}. You may now question them.", name));
        vec![Request::Dispatch(ClientAction::SelectSuspect {
            suspect_id: suspect_id.to_string(),
        })]
    }

    /// 向当前嫌疑人发送问话：先在本地追加侦探消息，再发送
    pub fn send_chat(&mut self, now: Duration, text: &str) -> Vec<Request> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        let Some(suspect_id) = self.store.session().and_then(|s| s.current_suspect_id.clone()) else {
            self.notify("Select a suspect first!".to_string());
            return Vec::new();
        };

        self.append_chat(now, ChatMessage::new("detective", text, Some("You")));
        vec![Request::Dispatch(ClientAction::ChatMessage {
            suspect_id,
            message: text.to_string(),
        })]
    }

    /// 打开工具；前置条件不满足时只发出提示
    pub fn open_tool(&mut self, tool: ToolName) {
        match self.tools.open(tool, self.store.session()).map(|_| ()) {
            Ok(()) => self.emit_tool_changed(),
            Err(message) => {
                self.notify(message);
                self.emit_tool_changed();
            }
        }
    }

    /// 修改工具字段
    pub fn set_tool_field(&mut self, name: &str, value: &str) -> Result<(), SubmitRejection> {
        match self.tools.set_field(name, value) {
            Ok(()) => {
                self.emit_tool_changed();
                Ok(())
            }
            Err(e) => {
                self.notify(e.to_string());
                Err(e)
            }
        }
    }

    /// 提交工具
    ///
    /// 校验失败时字段错误体现在工具状态中，不产生任何请求。
    pub fn submit_tool(&mut self) -> Vec<Request> {
        match self.tools.submit() {
            Ok((generation, action)) => {
                log::debug!("提交工具请求（代号 {}）", generation);
                self.emit_tool_changed();
                vec![Request::Tool { generation, action }]
            }
            Err(SubmitRejection::Invalid(_)) => {
                self.emit_tool_changed();
                Vec::new()
            }
            Err(e) => {
                self.notify(e.to_string());
                Vec::new()
            }
        }
    }

    /// 关闭工具（任意状态）
    pub fn close_tool(&mut self) {
        if self.tools.close() {
            self.emit_tool_changed();
        }
    }

    // ========== 内部辅助 ==========

    fn append_chat(&mut self, now: Duration, message: ChatMessage) {
        self.chat.append(
            message,
            &mut self.scheduler,
            now,
            self.timings.typing_interval,
            &mut self.outbox,
        );
    }

    fn post_system(&mut self, now: Duration, text: String) {
        self.append_chat(now, ChatMessage::system(text));
    }

    /// 排除之后的显示事件：排除通知、选择清空、撤回指向该嫌疑人的指控
    fn after_elimination(&mut self, suspect_id: String, newly: bool, selection_cleared: bool) {
        if newly {
            self.outbox.push(UiEvent::SuspectEliminated {
                suspect_id: suspect_id.clone(),
            });
        }
        if selection_cleared {
            self.outbox.push(UiEvent::SelectionCleared {
                suspect_id: suspect_id.clone(),
            });
        }
        if self.tools.withdraw_accusation(&suspect_id) {
            self.notify("Accusation withdrawn: that suspect has been eliminated.".to_string());
            self.emit_tool_changed();
        }
    }

    fn notify(&mut self, message: String) {
        self.outbox.push(UiEvent::Notification { message });
    }

    fn emit_status(&mut self) {
        if let Some(session) = self.store.session() {
            self.outbox.push(UiEvent::StatusChanged {
                round: session.round,
                points: session.points,
            });
        }
    }

    fn emit_tool_changed(&mut self) {
        self.outbox.push(UiEvent::ToolChanged {
            tool: self.tools.active().map(|s| s.tool),
            status: self.tools.status(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evidence::BoardKey;
    use serde_json::json;

    const SECOND: Duration = Duration::from_secs(1);

    fn init_game(unlocked: &[&str]) -> Value {
        json!({
            "action": "init_game",
            "data": {
                "round": 1,
                "points": 10,
                "scenario": {
                    "title": "The Gallery Poisoning",
                    "victim": {
                        "name": "Evelyn Marsh",
                        "age": 54,
                        "occupation": "Gallery Owner",
                        "time_of_death": "8:47 PM"
                    },
                    "suspects": [
                        {
                            "id": "suspect_1",
                            "name": "Clara Voss",
                            "role": "Curator",
                            "phone_number": "555-0101",
                            "gender": "female"
                        },
                        {
                            "id": "suspect_2",
                            "name": "Marcus Hale",
                            "role": "Janitor",
                            "phone_number": "555-0102",
                            "gender": "male"
                        }
                    ]
                },
                "unlocked_evidence": unlocked,
                "available_cameras": ["cam_lobby"],
                "dna_map": {}
            }
        })
    }

    fn started() -> GameClient {
        let mut client = GameClient::new(Timings::default(), vec![]);
        client.start(Duration::ZERO);
        client.on_response(Duration::ZERO, Ok(init_game(&[])));
        client.drain_ui_events();
        client
    }

    fn ready_count(requests: &[Request]) -> usize {
        requests
            .iter()
            .filter(|r| matches!(r.action(), ClientAction::Ready {}))
            .count()
    }

    #[test]
    fn test_handshake_retries_every_two_seconds_until_init() {
        let mut client = GameClient::new(Timings::default(), vec![]);
        assert_eq!(ready_count(&client.start(Duration::ZERO)), 1);

        assert_eq!(ready_count(&client.tick(SECOND)), 0);
        assert_eq!(ready_count(&client.tick(SECOND * 2)), 1);
        assert_eq!(ready_count(&client.tick(SECOND * 4)), 1);
        assert_eq!(client.next_deadline(), Some(SECOND * 6));
        assert!(!client.is_connected());

        client.on_response(SECOND * 5, Ok(init_game(&[])));
        assert!(client.is_connected());
        assert_eq!(ready_count(&client.tick(SECOND * 60)), 0);
    }

    #[test]
    fn test_zero_interval_does_not_stall_tick() {
        let timings = Timings {
            handshake_interval: Duration::ZERO,
            typing_interval: Duration::ZERO,
            result_close_delay: Duration::ZERO,
        };
        let mut client = GameClient::new(timings, vec![]);
        assert_eq!(ready_count(&client.start(Duration::ZERO)), 1);
        assert_eq!(ready_count(&client.tick(Duration::ZERO)), 0);

        let millis = Duration::from_millis;
        assert_eq!(ready_count(&client.tick(millis(1))), 1);
        assert_eq!(ready_count(&client.tick(millis(3))), 2);
        assert_eq!(client.next_deadline(), Some(millis(4)));
    }

    #[test]
    fn test_init_seeds_case_file_and_chat() {
        let mut client = GameClient::new(Timings::default(), vec![]);
        client.start(Duration::ZERO);
        client.on_response(Duration::ZERO, Ok(init_game(&[])));

        let events = client.drain_ui_events();
        assert_eq!(
            events[0],
            UiEvent::SessionStarted {
                title: "The Gallery Poisoning".to_string()
            }
        );
        let case_file = client.board().entry(&BoardKey::CaseFile).unwrap();
        assert_eq!(case_file.header_html, "CASE FILE");
        assert_eq!(case_file.content_fragments.len(), 1);

        let texts: Vec<&str> = client.chat().entries().iter().map(|e| e.message.text.as_str()).collect();
        assert_eq!(texts, vec!["CASE LOADED: The Gallery Poisoning", "VICTIM: Evelyn Marsh"]);
    }

    #[test]
    fn test_duplicate_init_is_ignored() {
        let mut client = started();
        client.on_response(SECOND, Ok(init_game(&["glass_1"])));
        assert!(client.session().unwrap().unlocked_evidence_ids.is_empty());
        assert_eq!(client.board().len(), 1);
        assert_eq!(client.chat().len(), 2);
    }

    #[test]
    fn test_accuse_without_suspect_never_calls_bridge() {
        let mut client = started();
        client.open_tool(ToolName::Accuse);
        assert!(client.submit_tool().is_empty());
        assert_eq!(client.tool_status(), ToolStatus::Idle);
        assert!(client.drain_ui_events().contains(&UiEvent::Notification {
            message: "Select a suspect first!".to_string()
        }));
    }

    #[test]
    fn test_dna_short_circuits_with_no_unlocked_evidence() {
        let mut client = started();
        client.open_tool(ToolName::GetDnaTest);
        assert!(client.tool().is_none());
    }

    #[test]
    fn test_alibi_with_one_empty_field_sends_nothing() {
        let mut client = started();
        client.open_tool(ToolName::CallAlibi);
        client.set_tool_field("alibi_id", "ALIBI-101").unwrap();
        assert!(client.submit_tool().is_empty());
        assert!(matches!(
            client.tool_status(),
            ToolStatus::Collecting { field_error: Some(_) }
        ));
    }

    #[test]
    fn test_location_tool_error_keeps_points() {
        let mut client = started();
        client.open_tool(ToolName::GetLocation);
        client.set_tool_field("phone_number", "555-0100").unwrap();
        let requests = client.submit_tool();
        let [Request::Tool { generation, .. }] = requests.as_slice() else {
            panic!("expected one tool request");
        };

        client.on_tool_response(
            SECOND,
            *generation,
            Ok(json!({ "action": "tool_error", "data": { "message": "Invalid number" } })),
        );
        assert_eq!(
            client.tool_status(),
            ToolStatus::Error {
                message: "Invalid number".to_string()
            }
        );
        assert_eq!(client.session().unwrap().points, 10);
        assert_eq!(client.submit_tool().len(), 1);
    }

    #[test]
    fn test_footage_result_merges_and_auto_closes() {
        let mut client = started();
        client.open_tool(ToolName::GetFootage);
        let requests = client.submit_tool();
        let [Request::Tool { generation, action }] = requests.as_slice() else {
            panic!("expected one tool request");
        };
        assert_eq!(
            serde_json::to_value(action).unwrap(),
            json!({ "action": "use_tool", "data": { "tool": "get_footage", "camera_id": "cam_lobby" } })
        );

        client.on_tool_response(
            SECOND,
            *generation,
            Ok(json!({
                "action": "add_evidence",
                "data": {
                    "title": "Lobby Footage",
                    "description": "A figure crosses the lobby.",
                    "type": "camera",
                    "newly_unlocked": ["glass_1"],
                    "updated_points": 8
                }
            })),
        );
        assert!(matches!(client.tool_status(), ToolStatus::Result { .. }));
        let case_file = client.board().entry(&BoardKey::CaseFile).unwrap();
        assert_eq!(case_file.content_fragments.len(), 2);
        assert_eq!(client.session().unwrap().points, 8);
        assert!(client.drain_ui_events().contains(&UiEvent::EvidenceUnlocked {
            ids: vec!["glass_1".to_string()]
        }));

        client.tick(SECOND * 5);
        assert!(client.tool().is_some());
        client.tick(SECOND * 6);
        assert_eq!(client.tool_status(), ToolStatus::Idle);
    }

    #[test]
    fn test_late_success_after_close_still_dispatches() {
        let mut client = started();
        client.open_tool(ToolName::GetLocation);
        client.set_tool_field("phone_number", "555-0101").unwrap();
        let requests = client.submit_tool();
        let [Request::Tool { generation, .. }] = requests.as_slice() else {
            panic!("expected one tool request");
        };
        client.close_tool();

        client.on_tool_response(
            SECOND,
            *generation,
            Ok(json!({
                "action": "add_evidence",
                "data": { "title": "Phone Ping", "type": "location", "suspect_id": "suspect_1" }
            })),
        );
        assert_eq!(client.tool_status(), ToolStatus::Idle);
        let entry = client
            .board()
            .entry(&BoardKey::Suspect("suspect_1".to_string()))
            .unwrap();
        assert_eq!(entry.header_html, "Clara Voss");
        // 没有活动会话，不会登记自动关闭
        assert!(client.next_deadline().is_none());
    }

    #[test]
    fn test_chat_requires_selection() {
        let mut client = started();
        assert!(client.send_chat(SECOND, "Where were you?").is_empty());

        let requests = client.select_suspect(SECOND, "suspect_1");
        assert_eq!(
            requests,
            vec![Request::Dispatch(ClientAction::SelectSuspect {
                suspect_id: "suspect_1".to_string()
            })]
        );
        let last = client.chat().entries().last().unwrap();
        assert_eq!(last.message.text, "Selected suspect: Clara Voss. You may now question them.");

        assert!(client.send_chat(SECOND, "   ").is_empty());
        let requests = client.send_chat(SECOND, "Where were you?");
        assert_eq!(requests.len(), 1);
        assert_eq!(client.chat().entries().last().unwrap().message.display_name, "YOU");
    }

    #[test]
    fn test_round_failure_eliminates_suspect() {
        let mut client = started();
        client.select_suspect(SECOND, "suspect_2");
        client.dispatch(
            SECOND,
            ServerEvent::RoundFailure(crate::models::event::RoundFailurePayload {
                message: "Wrong suspect! Round 2 begins.".to_string(),
                eliminated_id: Some("suspect_2".to_string()),
                new_round: Some(2),
                new_points: Some(10),
            }),
        );
        let session = client.session().unwrap();
        assert_eq!(session.round, 2);
        assert!(session.current_suspect_id.is_none());
        let events = client.drain_ui_events();
        assert!(events.contains(&UiEvent::SuspectEliminated {
            suspect_id: "suspect_2".to_string()
        }));
        assert!(events.contains(&UiEvent::SelectionCleared {
            suspect_id: "suspect_2".to_string()
        }));
    }

    #[test]
    fn test_elimination_clears_selection_and_withdraws_accusation() {
        let mut client = started();
        client.select_suspect(SECOND, "suspect_1");
        client.open_tool(ToolName::Accuse);
        client.drain_ui_events();

        client.on_response(
            SECOND * 2,
            Ok(json!({
                "action": "update_status",
                "data": { "eliminated_id": "suspect_1" }
            })),
        );
        assert!(client.session().unwrap().current_suspect_id.is_none());
        assert_eq!(client.tool_status(), ToolStatus::Idle);

        let events = client.drain_ui_events();
        assert!(events.contains(&UiEvent::SelectionCleared {
            suspect_id: "suspect_1".to_string()
        }));
        assert!(events.contains(&UiEvent::ToolChanged {
            tool: None,
            status: ToolStatus::Idle
        }));
        assert!(events.iter().any(|e| matches!(e, UiEvent::Notification { .. })));
    }

    #[test]
    fn test_elimination_of_other_suspect_keeps_selection() {
        let mut client = started();
        client.select_suspect(SECOND, "suspect_1");
        client.open_tool(ToolName::Accuse);
        client.drain_ui_events();

        client.on_response(
            SECOND * 2,
            Ok(json!({
                "action": "update_status",
                "data": { "eliminated_id": "suspect_2" }
            })),
        );
        assert_eq!(
            client.session().unwrap().current_suspect_id.as_deref(),
            Some("suspect_1")
        );
        assert!(client.tool().is_some());
        let events = client.drain_ui_events();
        assert!(!events.iter().any(|e| matches!(e, UiEvent::SelectionCleared { .. })));
    }

    #[test]
    fn test_portrait_is_stable() {
        let catalog = vec![
            PortraitDescriptor {
                id: "m_worker_1".to_string(),
                gender: "male".to_string(),
                archetype: "worker".to_string(),
            },
            PortraitDescriptor {
                id: "f_artist_1".to_string(),
                gender: "female".to_string(),
                archetype: "artist".to_string(),
            },
        ];
        let mut client = GameClient::new(Timings::default(), catalog);
        client.start(Duration::ZERO);
        client.on_response(Duration::ZERO, Ok(init_game(&[])));

        assert_eq!(client.portrait_for("suspect_2").as_deref(), Some("m_worker_1"));
        assert_eq!(client.portrait_for("suspect_1"), client.portrait_for("suspect_1"));
        assert_eq!(client.portrait_for("suspect_9"), None);
    }
}
