//! # 会话快照数据模型
//!
//! [`Session`] 是客户端持有的唯一权威快照，在收到 `init_game` 时创建，
//! 之后只被服务端事件或本地的选人动作原地修改，整局游戏中不会重建。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::event::InitGamePayload;
use crate::models::scenario::{PortraitDescriptor, Scenario, Suspect};

/// 未下发总轮数时的默认值（三次指控机会）
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// 对局结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub won: bool,
    pub message: String,
}

/// 会话快照
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub round: u32,
    pub max_rounds: u32,
    /// 调查点数：服务端权威，客户端只覆盖、从不自行计算
    pub points: i64,
    pub scenario: Scenario,
    pub current_suspect_id: Option<String>,
    /// 已解锁证物 ID（有序集合：保持到达顺序，不重复）
    pub unlocked_evidence_ids: Vec<String>,
    pub available_camera_ids: Vec<String>,
    pub dna_label_map: BTreeMap<String, String>,
    pub portrait_catalog: Vec<PortraitDescriptor>,
    /// 对局结束后为 Some
    pub outcome: Option<GameOutcome>,
}

impl Session {
    /// 由 `init_game` 载荷和启动时加载的头像目录创建会话
    pub fn from_init(payload: InitGamePayload, portrait_catalog: Vec<PortraitDescriptor>) -> Self {
        let mut session = Self {
            round: payload.round,
            max_rounds: payload.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS),
            points: payload.points,
            scenario: payload.scenario,
            current_suspect_id: None,
            unlocked_evidence_ids: Vec::new(),
            available_camera_ids: payload.available_cameras,
            dna_label_map: payload.dna_map,
            portrait_catalog,
            outcome: None,
        };
        session.unlock(payload.unlocked_evidence);
        session
    }

    /// 把证物 ID 并入已解锁集合，返回真正新增的 ID（保持输入顺序）
    pub fn unlock<I>(&mut self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = Vec::new();
        for id in ids {
            if !self.unlocked_evidence_ids.contains(&id) {
                self.unlocked_evidence_ids.push(id.clone());
                added.push(id);
            }
        }
        added
    }

    /// DNA 证物的显示标签，缺省时回退为 ID 本身
    pub fn dna_label<'a>(&'a self, evidence_id: &'a str) -> &'a str {
        self.dna_label_map
            .get(evidence_id)
            .map(String::as_str)
            .unwrap_or(evidence_id)
    }

    pub fn current_suspect(&self) -> Option<&Suspect> {
        self.current_suspect_id
            .as_deref()
            .and_then(|id| self.scenario.suspect(id))
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}
