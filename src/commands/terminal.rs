//! # 终端呈现器
//!
//! 把显示事件渲染为纯文本行。HTML 片段在输出前剥离标签。
//! 嫌疑人消息在逐字显示完成时整行输出，避免与其他输出交错。

use std::io::Write;

use crate::models::display::UiEvent;
use crate::models::evidence::{BoardMutation, ContentFragment};
use crate::models::tool::{FieldKind, ToolStatus};
use crate::services::client::GameClient;
use crate::services::runtime::{Presenter, View};
use crate::utils::html::strip_tags;

const HELP: &str = "\
Commands:
  select <id>          choose a suspect to question
  say <text>           question the selected suspect (plain text works too)
  tool <name>          open a tool: get_location | get_footage | get_dna_test | call_alibi | accuse
  set <field> <value>  fill a tool field
  submit / close       submit or close the open tool
  board / status       show the evidence board or the case status
  quit                 leave the game";

/// 终端呈现器，输出目标可替换（测试中写入内存）
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::warn!("终端输出失败: {}", e);
        }
    }

    fn print_fragment(&mut self, fragment: &ContentFragment) {
        if let Some(title) = &fragment.title {
            self.line(&format!("  - {}", title));
        }
        for text in strip_tags(&fragment.body_html).lines() {
            self.line(&format!("    {}", text));
        }
    }

    fn print_chat(&mut self, client: &GameClient, index: usize) {
        if let Some(entry) = client.chat().get(index) {
            let text = format!("{}: {}", entry.message.display_name, entry.message.text);
            self.line(&text);
        }
    }

    fn print_tool(&mut self, client: &GameClient) {
        let Some(session) = client.tool() else {
            self.line("[tool closed]");
            return;
        };
        match &session.status {
            ToolStatus::Collecting { field_error } => {
                self.line(&format!("[{}]", session.tool));
                for field in &session.fields {
                    let mut text = format!("  {} = {:?}", field.name, field.value);
                    if let FieldKind::Select(options) = &field.kind {
                        let labels: Vec<String> = options
                            .iter()
                            .map(|(value, label)| {
                                if value == label {
                                    value.clone()
                                } else {
                                    format!("{} ({})", value, label)
                                }
                            })
                            .collect();
                        text.push_str(&format!("  options: {}", labels.join(", ")));
                    }
                    self.line(&text);
                }
                if let Some(error) = field_error {
                    self.line(&format!("  ! {}", error));
                }
            }
            ToolStatus::Submitting => self.line(&format!("[{}] submitting...", session.tool)),
            ToolStatus::Error { message } => {
                self.line(&format!("[{}] error: {}", session.tool, message))
            }
            ToolStatus::Result { summary } => {
                self.line(&format!("[{}] result:", session.tool));
                for text in summary.lines() {
                    self.line(&format!("  {}", text));
                }
            }
            ToolStatus::Idle => {}
        }
    }

    fn print_board(&mut self, client: &GameClient) {
        if client.board().is_empty() {
            self.line("(the evidence board is empty)");
            return;
        }
        for entry in client.board().entries() {
            self.line(&format!("# {} [{}]", strip_tags(&entry.header_html), entry.key.as_str()));
            for fragment in &entry.content_fragments {
                self.print_fragment(fragment);
            }
        }
    }

    fn print_status(&mut self, client: &GameClient) {
        let Some(session) = client.session() else {
            self.line("Waiting for the case file...");
            return;
        };
        self.line(&format!(
            "{} | Round {}/{} | Points {}",
            session.scenario.title, session.round, session.max_rounds, session.points
        ));
        for suspect in &session.scenario.suspects {
            let marker = if session.current_suspect_id.as_deref() == Some(suspect.id.as_str()) {
                ">"
            } else {
                " "
            };
            let state = if suspect.eliminated { " (eliminated)" } else { "" };
            let portrait = client.portrait_for(&suspect.id).unwrap_or_default();
            self.line(&format!(
                "{} {} {} - {} [{}]{}",
                marker, suspect.id, suspect.name, suspect.role, portrait, state
            ));
        }
        if !session.unlocked_evidence_ids.is_empty() {
            let labels: Vec<&str> = session
                .unlocked_evidence_ids
                .iter()
                .map(|id| session.dna_label(id))
                .collect();
            self.line(&format!("Unlocked evidence: {}", labels.join(", ")));
        }
        if let Some(outcome) = &session.outcome {
            self.line(&format!("Case closed: {}", outcome.message));
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, client: &GameClient, events: Vec<UiEvent>) {
        for event in events {
            match event {
                UiEvent::SessionStarted { title } => {
                    self.line(&format!("=== {} ===", title));
                    self.print_status(client);
                }
                UiEvent::StatusChanged { round, points } => {
                    self.line(&format!("[round {} | points {}]", round, points));
                }
                UiEvent::ChatAppended { index } => {
                    if client.chat().get(index).is_some_and(|e| e.is_complete()) {
                        self.print_chat(client, index);
                    }
                }
                UiEvent::ChatRevealed { index, complete: true, .. } => self.print_chat(client, index),
                UiEvent::ChatRevealed { .. } | UiEvent::ScrollToBottom => {}
                UiEvent::Board(mutation) => {
                    let index = match mutation {
                        BoardMutation::Created { index, .. } | BoardMutation::Appended { index, .. } => index,
                    };
                    if let Some(entry) = client.board().entries().get(index) {
                        let header = strip_tags(&entry.header_html);
                        let verb = match mutation {
                            BoardMutation::Created { .. } => "new entry",
                            BoardMutation::Appended { .. } => "updated",
                        };
                        self.line(&format!("[board] {}: {}", verb, header));
                        if let Some(fragment) = entry.content_fragments.last() {
                            self.print_fragment(fragment);
                        }
                    }
                }
                UiEvent::EvidenceUnlocked { ids } => {
                    self.line(&format!("[unlocked] {}", ids.join(", ")));
                }
                UiEvent::Notification { message } => self.line(&format!("! {}", message)),
                UiEvent::SuspectSelected { .. } => {}
                UiEvent::SelectionCleared { .. } => {
                    self.line("[selection cleared] select another suspect to continue");
                }
                UiEvent::SuspectEliminated { suspect_id } => {
                    let name = client
                        .session()
                        .and_then(|s| s.scenario.suspect(&suspect_id))
                        .map(|s| s.name.clone())
                        .unwrap_or(suspect_id);
                    self.line(&format!("[eliminated] {}", name));
                }
                UiEvent::ToolChanged { .. } => self.print_tool(client),
                UiEvent::GameOver { won, message } => {
                    let banner = if won { "CASE SOLVED" } else { "CASE LOST" };
                    self.line(&format!("*** {} *** {}", banner, message));
                }
            }
        }
        if let Err(e) = self.out.flush() {
            log::warn!("终端输出失败: {}", e);
        }
    }

    fn show(&mut self, client: &GameClient, view: View) {
        match view {
            View::Board => self.print_board(client),
            View::Status => {
                self.print_status(client);
                self.print_tool(client);
            }
            View::Help => self.line(HELP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Timings;
    use serde_json::json;
    use std::time::Duration;

    fn client() -> GameClient {
        let mut client = GameClient::new(Timings::default(), vec![]);
        client.start(Duration::ZERO);
        client.on_response(
            Duration::ZERO,
            Ok(json!({
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
                        "suspects": [{
                            "id": "suspect_1",
                            "name": "Clara Voss",
                            "role": "Curator",
                            "phone_number": "555-0101"
                        }]
                    }
                }
            })),
        );
        client
    }

    #[test]
    fn test_session_start_prints_case_and_chat() {
        let mut client = client();
        let mut presenter = TerminalPresenter::new(Vec::new());
        let events = client.drain_ui_events();
        presenter.present(&client, events);

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.contains("=== The Gallery Poisoning ==="));
        assert!(text.contains("suspect_1 Clara Voss - Curator [suspect_1]"));
        assert!(text.contains("[board] new entry: CASE FILE"));
        assert!(text.contains("    VICTIM: Evelyn Marsh (54)"));
        assert!(text.contains("SYSTEM: CASE LOADED: The Gallery Poisoning"));
    }

    #[test]
    fn test_cleared_selection_is_announced() {
        let mut client = client();
        client.select_suspect(Duration::from_secs(1), "suspect_1");
        client.drain_ui_events();
        client.on_response(
            Duration::from_secs(2),
            Ok(json!({ "action": "update_status", "data": { "eliminated_id": "suspect_1" } })),
        );

        let mut presenter = TerminalPresenter::new(Vec::new());
        let events = client.drain_ui_events();
        presenter.present(&client, events);
        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.contains("[eliminated] Clara Voss"));
        assert!(text.contains("[selection cleared]"));
    }

    #[test]
    fn test_board_view_lists_entries() {
        let client = client();
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.show(&client, View::Board);
        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.starts_with("# CASE FILE [case-file]"));
        assert!(text.contains("    LOCATION: Unknown"));
    }
}
