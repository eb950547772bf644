//! # 证据聚合服务
//!
//! 持有证据板模型，决定每个到达的证据片段是新建卡片还是并入已有卡片。
//!
//! ## 路由规则（按顺序）
//! 1. 片段带 `suspect_id` → 目标为该嫌疑人的卡片
//! 2. 否则 → 目标为唯一的案件档案卡片（`type == "file"` 与其他类型一致）
//!
//! 目标存在时只追加一个内容片段（标题取片段标题，正文取 `html_content` 或 `description`），
//! 从不替换卡片标题；目标不存在时新建卡片，标题依次取嫌疑人名、片段标题、"Evidence"。
//!
//! ## 不变量
//! - 每个嫌疑人 ID 至多一张卡片，案件档案至多一张
//! - 卡片内容只增不减，生命周期与会话相同
//!
//! ## 解锁旁路
//! `newly_unlocked` 并入会话的已解锁集合（幂等），并单独发出解锁通知；
//! `updated_points` 直接覆盖会话点数（后写者胜，点数只由服务端计算）。

use crate::models::evidence::{BoardEntry, BoardKey, BoardMutation, ContentFragment, EvidenceFragment};
use crate::models::scenario::Victim;
use crate::models::session::Session;
use crate::utils::html::escape_html;

/// 新建卡片且没有任何可用标题时的兜底标题
const FALLBACK_HEADER: &str = "Evidence";

/// 案件档案片段的标题
pub const CASE_FILE_TITLE: &str = "CASE FILE";

/// 一次摄入的完整结果
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// 证据板的变化
    pub mutation: BoardMutation,
    /// 真正新增到已解锁集合的证物 ID（为空则不发通知）
    pub unlocked: Vec<String>,
    /// 点数是否被覆盖
    pub points_updated: bool,
}

/// 证据板
#[derive(Debug, Default)]
pub struct EvidenceBoard {
    entries: Vec<BoardEntry>,
}

impl EvidenceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BoardEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &BoardKey) -> Option<&BoardEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 摄入一个证据片段
    ///
    /// # 参数
    /// - `fragment` - 证据片段（消费后不保留）
    /// - `session` - 当前会话；存在时处理解锁与点数旁路，并用于回查嫌疑人姓名
    pub fn ingest(&mut self, fragment: EvidenceFragment, session: Option<&mut Session>) -> IngestOutcome {
        let key = route(&fragment);
        let body_html = fragment.body().to_string();

        let mutation = match self.entries.iter().position(|e| e.key == key) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.content_fragments.push(ContentFragment {
                    title: fragment.title.clone(),
                    body_html,
                });
                BoardMutation::Appended {
                    key,
                    index,
                    fragments: entry.content_fragments.len(),
                }
            }
            None => {
                let header = header_for(&fragment, session.as_deref());
                self.entries.push(BoardEntry {
                    key: key.clone(),
                    header_html: escape_html(&header),
                    content_fragments: vec![ContentFragment {
                        title: fragment.title.clone(),
                        body_html,
                    }],
                });
                BoardMutation::Created {
                    key,
                    index: self.entries.len() - 1,
                }
            }
        };

        let mut unlocked = Vec::new();
        let mut points_updated = false;
        if let Some(session) = session {
            if let Some(ids) = fragment.newly_unlocked {
                unlocked = session.unlock(ids);
            }
            if let Some(points) = fragment.updated_points {
                session.points = points;
                points_updated = true;
            }
        }

        IngestOutcome {
            mutation,
            unlocked,
            points_updated,
        }
    }
}

/// 计算片段的目标卡片键
fn route(fragment: &EvidenceFragment) -> BoardKey {
    match fragment.suspect_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => BoardKey::Suspect(id.to_string()),
        _ => BoardKey::CaseFile,
    }
}

/// 新建卡片的标题：嫌疑人名 → 片段标题 → 兜底标题
///
/// 片段没带嫌疑人名时，按 `suspect_id` 回查剧本中的姓名。
fn header_for(fragment: &EvidenceFragment, session: Option<&Session>) -> String {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string);

    non_empty(&fragment.suspect_name)
        .or_else(|| {
            let id = fragment.suspect_id.as_deref()?;
            session?.scenario.suspect(id).map(|s| s.name.clone())
        })
        .or_else(|| non_empty(&fragment.title))
        .unwrap_or_else(|| FALLBACK_HEADER.to_string())
}

/// 构造案件档案片段（警方报告）
///
/// 会话初始化时由客户端本地生成并摄入，作为案件档案卡片的第一块内容。
pub fn case_file_fragment(title: &str, victim: &Victim) -> EvidenceFragment {
    let location = victim.location.as_deref().unwrap_or("Unknown");
    let html = format!(
        concat!(
            "<div class=\"report-header\"><strong>POLICE REPORT</strong></div>",
            "<div><strong>CASE:</strong> {}</div>",
            "<div><strong>VICTIM:</strong> {} ({})</div>",
            "<div><strong>OCCUPATION:</strong> {}</div>",
            "<div><strong>TIME OF DEATH:</strong> {}</div>",
            "<div><strong>LOCATION:</strong> {}</div>"
        ),
        escape_html(title),
        escape_html(&victim.name),
        victim.age,
        escape_html(&victim.occupation),
        escape_html(&victim.time_of_death),
        escape_html(location),
    );

    EvidenceFragment {
        title: Some(CASE_FILE_TITLE.to_string()),
        html_content: Some(html),
        kind: "file".to_string(),
        ..EvidenceFragment::default()
    }
}
