//! # 调查工具数据模型
//!
//! 定义 5 种调查工具、各自的输入字段约定，以及工具会话（ToolSession）的状态。
//!
//! | 工具 | 字段 | 说明 |
//! |------|------|------|
//! | `get_location` | `phone_number` | 自由文本 |
//! | `get_footage` | `camera_id` | 从可用摄像头中选择 |
//! | `get_dna_test` | `evidence_id` | 从已解锁证物中选择 |
//! | `call_alibi` | `alibi_id` + `question` | 两个必填字段 |
//! | `accuse` | `confirmation` | 必须（忽略大小写）等于确认口令 |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// 指控确认口令
pub const ACCUSE_CONFIRMATION_TOKEN: &str = "GUILTY";

/// 调查工具
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetLocation,
    GetFootage,
    GetDnaTest,
    CallAlibi,
    Accuse,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::GetLocation,
        ToolName::GetFootage,
        ToolName::GetDnaTest,
        ToolName::CallAlibi,
        ToolName::Accuse,
    ];

    /// 线上工具名
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetLocation => "get_location",
            ToolName::GetFootage => "get_footage",
            ToolName::GetDnaTest => "get_dna_test",
            ToolName::CallAlibi => "call_alibi",
            ToolName::Accuse => "accuse",
        }
    }

    /// 该工具要求的字段名（按表单顺序）
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            ToolName::GetLocation => &["phone_number"],
            ToolName::GetFootage => &["camera_id"],
            ToolName::GetDnaTest => &["evidence_id"],
            ToolName::CallAlibi => &["alibi_id", "question"],
            ToolName::Accuse => &["confirmation"],
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("未知工具: {}", s))
    }
}

/// 字段输入方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "camelCase")]
pub enum FieldKind {
    /// 自由文本
    Text,
    /// 下拉选择：(值, 显示标签)
    Select(Vec<(String, String)>),
}

/// 表单字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

/// 工具会话状态
///
/// `Idle` 不会出现在活动会话上：关闭即丢弃会话，状态回到 `Idle`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ToolStatus {
    Idle,
    /// 收集输入；`field_error` 为本地校验失败信息
    Collecting { field_error: Option<String> },
    /// 请求在途，拒绝再次提交
    Submitting,
    /// 服务端拒绝或传输失败，可修改后重新提交
    Error { message: String },
    /// 成功，`summary` 为内联展示的结果
    Result { summary: String },
}

/// 工具会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSession {
    pub tool: ToolName,
    pub fields: Vec<ToolField>,
    pub status: ToolStatus,
    /// 会话代号：每次 open 递增，用于识别过期的响应与定时器
    pub generation: u64,
    /// 打开时锁定的目标嫌疑人（仅 accuse 使用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_suspect_id: Option<String>,
}

impl ToolSession {
    pub fn field(&self, name: &str) -> Option<&ToolField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut ToolField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// 字段名 → 去除首尾空白后的值
    pub fn values(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.value.trim().to_string()))
            .collect()
    }
}
