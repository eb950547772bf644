//! # 证据数据模型
//!
//! - [`EvidenceFragment`]：`add_evidence` 事件的线上载荷，消费后即丢弃
//! - [`BoardEntry`]：证据板上的一张卡片，按 [`BoardKey`] 唯一
//! - [`BoardMutation`]：一次摄入对证据板造成的变化，供显示层增量渲染

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 案件档案卡片的固定键
pub const CASE_FILE_KEY: &str = "case-file";

/// 证据片段（线上载荷）
///
/// 服务端字段为 snake_case，同时兼容 camelCase 别名。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvidenceFragment {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 已渲染的 HTML 内容，存在时优先于 `description`
    #[serde(default, alias = "htmlContent")]
    pub html_content: Option<String>,
    /// 证据类型："file" 表示案件档案，其余如 "camera" / "dna" / "location"
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, alias = "suspectId")]
    pub suspect_id: Option<String>,
    #[serde(default, alias = "suspectName")]
    pub suspect_name: Option<String>,
    /// 本次新解锁的证物 ID（如录像解锁了可做 DNA 检测的物品）
    #[serde(default, alias = "newlyUnlocked")]
    pub newly_unlocked: Option<Vec<String>>,
    /// 服务端计算后的最新点数，客户端只做覆盖
    #[serde(default, alias = "updatedPoints")]
    pub updated_points: Option<i64>,
    /// 产生该证据的工具名
    #[serde(default)]
    pub tool: Option<String>,
    /// 工具原始结果数据，供结果格式化使用
    #[serde(default)]
    pub details: Option<Value>,
}

impl EvidenceFragment {
    /// 片段正文：`html_content` 优先，其次 `description`
    pub fn body(&self) -> &str {
        self.html_content
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    pub fn is_case_file(&self) -> bool {
        self.kind == "file"
    }
}

/// 证据板卡片键
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum BoardKey {
    /// 通用案件档案（至多一张）
    CaseFile,
    /// 某个嫌疑人的卡片（每个嫌疑人至多一张）
    Suspect(String),
}

impl BoardKey {
    /// 线上/显示层使用的字符串键
    pub fn as_str(&self) -> &str {
        match self {
            BoardKey::CaseFile => CASE_FILE_KEY,
            BoardKey::Suspect(id) => id,
        }
    }
}

/// 卡片中的单个内容片段
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFragment {
    /// 片段标题（追加时取证据标题）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// HTML 正文
    pub body_html: String,
}

/// 证据板卡片
///
/// 标题在创建时确定，之后只追加内容、从不替换标题，内容也从不删减。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntry {
    pub key: BoardKey,
    pub header_html: String,
    pub content_fragments: Vec<ContentFragment>,
}

/// 一次摄入对证据板的修改
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum BoardMutation {
    /// 新建卡片
    Created { key: BoardKey, index: usize },
    /// 向已有卡片追加一个内容片段；`fragments` 为追加后的片段数
    Appended {
        key: BoardKey,
        index: usize,
        fragments: usize,
    },
}

impl BoardMutation {
    pub fn key(&self) -> &BoardKey {
        match self {
            BoardMutation::Created { key, .. } | BoardMutation::Appended { key, .. } => key,
        }
    }
}
