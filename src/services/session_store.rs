//! # 会话存储服务
//!
//! 持有唯一的 [`Session`] 快照，并提供"服务端事件 → 快照修改"的归约函数。
//! 快照只会被两类输入修改：
//! - 服务端事件（`init_game` / `update_status` / `round_failure` / `game_over`，以及证据旁路）
//! - 本地选人动作（随后通过桥接转发给服务端）
//!
//! 每个归约函数返回本次修改的摘要，由上层决定发出哪些显示事件、追加哪些系统消息。

use crate::models::event::{GameOverPayload, InitGamePayload, RoundFailurePayload, StatusPayload};
use crate::models::scenario::{PortraitDescriptor, Suspect};
use crate::models::session::{GameOutcome, Session};

/// `update_status` 的修改摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusChange {
    /// 轮数或点数发生了覆盖
    pub counters_changed: bool,
    /// 新排除的嫌疑人
    pub eliminated: Option<String>,
    /// 真正新增的已解锁证物
    pub unlocked: Vec<String>,
    /// 是否因排除而清空了当前选择
    pub selection_cleared: bool,
}

/// `round_failure` 的修改摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundChange {
    pub eliminated: Option<String>,
    pub selection_cleared: bool,
}

/// 会话存储
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// 处理 `init_game`
    ///
    /// 会话只创建一次；会话已存在时忽略并返回 None。
    pub fn init(&mut self, payload: InitGamePayload, catalog: Vec<PortraitDescriptor>) -> Option<&Session> {
        if self.session.is_some() {
            log::warn!("会话已存在，忽略重复的 init_game");
            return None;
        }
        let session = self.session.insert(Session::from_init(payload, catalog));
        log::info!(
            "案件已加载: {}（{} 名嫌疑人，第 {}/{} 轮）",
            session.scenario.title,
            session.scenario.suspects.len(),
            session.round,
            session.max_rounds
        );
        Some(&*session)
    }

    /// 处理 `update_status`：出现的字段直接覆盖
    pub fn apply_status(&mut self, payload: StatusPayload) -> StatusChange {
        let Some(session) = self.session.as_mut() else {
            log::warn!("会话尚未建立，忽略 update_status");
            return StatusChange::default();
        };

        let mut change = StatusChange::default();
        if let Some(round) = payload.round {
            session.round = round;
            change.counters_changed = true;
        }
        if let Some(points) = payload.points {
            session.points = points;
            change.counters_changed = true;
        }
        if let Some(ids) = payload.unlocked_evidence {
            change.unlocked = session.unlock(ids);
        }
        if let Some(id) = payload.eliminated_id {
            let (newly, cleared) = eliminate(session, &id);
            if newly {
                change.eliminated = Some(id);
            }
            change.selection_cleared = cleared;
        }
        change
    }

    /// 处理 `round_failure`：排除嫌疑人并进入新一轮
    pub fn apply_round_failure(&mut self, payload: &RoundFailurePayload) -> RoundChange {
        let Some(session) = self.session.as_mut() else {
            log::warn!("会话尚未建立，忽略 round_failure");
            return RoundChange::default();
        };

        if let Some(round) = payload.new_round {
            session.round = round;
        }
        if let Some(points) = payload.new_points {
            session.points = points;
        }

        let mut change = RoundChange::default();
        if let Some(id) = &payload.eliminated_id {
            let (newly, cleared) = eliminate(session, id);
            if newly {
                change.eliminated = Some(id.clone());
            }
            change.selection_cleared = cleared;
        }
        log::info!("指控失败，进入第 {} 轮", session.round);
        change
    }

    /// 处理 `game_over`
    pub fn apply_game_over(&mut self, payload: GameOverPayload) -> GameOutcome {
        let outcome = GameOutcome {
            won: payload.is_win(),
            message: payload.message,
        };
        match self.session.as_mut() {
            Some(session) => session.outcome = Some(outcome.clone()),
            None => log::warn!("会话尚未建立时收到 game_over"),
        }
        log::info!("对局结束: {}", if outcome.won { "胜利" } else { "失败" });
        outcome
    }

    /// 本地选择嫌疑人
    ///
    /// # 错误
    /// 会话未建立、对局已结束、嫌疑人不存在或已被排除时返回提示信息
    pub fn select(&mut self, suspect_id: &str) -> Result<&Suspect, String> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| "The case file has not loaded yet.".to_string())?;
        if session.is_over() {
            return Err("The case is closed.".to_string());
        }

        let suspect = session
            .scenario
            .suspect(suspect_id)
            .ok_or_else(|| format!("Unknown suspect: {}", suspect_id))?;
        if suspect.eliminated {
            return Err(format!("{} has already been eliminated.", suspect.name));
        }

        session.current_suspect_id = Some(suspect_id.to_string());
        session
            .scenario
            .suspect(suspect_id)
            .ok_or_else(|| format!("Unknown suspect: {}", suspect_id))
    }
}

/// 标记嫌疑人为已排除
///
/// # 返回值
/// `(是否新排除, 是否清空了当前选择)`
fn eliminate(session: &mut Session, suspect_id: &str) -> (bool, bool) {
    let newly = match session.scenario.suspect_mut(suspect_id) {
        Some(suspect) if !suspect.eliminated => {
            suspect.eliminated = true;
            true
        }
        Some(_) => false,
        None => {
            log::warn!("排除了不存在的嫌疑人: {}", suspect_id);
            false
        }
    };

    let cleared = session.current_suspect_id.as_deref() == Some(suspect_id);
    if cleared {
        session.current_suspect_id = None;
    }
    (newly, cleared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scenario::{Scenario, Victim};

    fn payload() -> InitGamePayload {
        let suspect = |id: &str, name: &str| Suspect {
            id: id.to_string(),
            name: name.to_string(),
            role: "Curator".to_string(),
            phone_number: "555-0101".to_string(),
            gender: None,
            eliminated: false,
            alibi_id: None,
        };
        InitGamePayload {
            round: 1,
            points: 10,
            scenario: Scenario {
                title: "The Gallery Poisoning".to_string(),
                victim: Victim {
                    name: "Evelyn Marsh".to_string(),
                    age: 54,
                    occupation: "Gallery Owner".to_string(),
                    time_of_death: "8:47 PM".to_string(),
                    location: None,
                },
                suspects: vec![suspect("suspect_1", "Clara Voss"), suspect("suspect_2", "Marcus Hale")],
            },
            unlocked_evidence: vec![],
            available_cameras: vec![],
            dna_map: Default::default(),
            max_rounds: None,
        }
    }

    #[test]
    fn test_second_init_is_ignored() {
        let mut store = SessionStore::new();
        assert!(store.init(payload(), vec![]).is_some());
        store.session_mut().unwrap().points = 4;
        assert!(store.init(payload(), vec![]).is_none());
        assert_eq!(store.session().unwrap().points, 4);
    }

    #[test]
    fn test_round_failure_eliminates_and_clears_selection() {
        let mut store = SessionStore::new();
        store.init(payload(), vec![]);
        store.select("suspect_2").unwrap();

        let change = store.apply_round_failure(&RoundFailurePayload {
            message: "Wrong suspect!".to_string(),
            eliminated_id: Some("suspect_2".to_string()),
            new_round: Some(2),
            new_points: Some(10),
        });
        assert_eq!(change.eliminated.as_deref(), Some("suspect_2"));
        assert!(change.selection_cleared);

        let session = store.session().unwrap();
        assert_eq!(session.round, 2);
        assert!(session.current_suspect_id.is_none());
        assert!(session.scenario.suspect("suspect_2").unwrap().eliminated);
        // 嫌疑人从不被移除
        assert_eq!(session.scenario.suspects.len(), 2);
    }

    #[test]
    fn test_cannot_select_eliminated_suspect() {
        let mut store = SessionStore::new();
        store.init(payload(), vec![]);
        store.apply_status(StatusPayload {
            eliminated_id: Some("suspect_1".to_string()),
            ..StatusPayload::default()
        });
        assert_eq!(
            store.select("suspect_1").unwrap_err(),
            "Clara Voss has already been eliminated."
        );
        assert!(store.select("suspect_9").is_err());
    }

    #[test]
    fn test_status_overwrites_present_fields_only() {
        let mut store = SessionStore::new();
        store.init(payload(), vec![]);
        let change = store.apply_status(StatusPayload {
            points: Some(3),
            unlocked_evidence: Some(vec!["glass_1".to_string()]),
            ..StatusPayload::default()
        });
        assert!(change.counters_changed);
        assert_eq!(change.unlocked, vec!["glass_1"]);
        let session = store.session().unwrap();
        assert_eq!((session.round, session.points), (1, 3));
    }

    #[test]
    fn test_game_over_records_outcome() {
        let mut store = SessionStore::new();
        store.init(payload(), vec![]);
        let outcome = store.apply_game_over(GameOverPayload {
            result: "win".to_string(),
            message: "Case solved!".to_string(),
        });
        assert!(outcome.won);
        assert!(store.session().unwrap().is_over());
        assert_eq!(store.select("suspect_1").unwrap_err(), "The case is closed.");
    }
}
