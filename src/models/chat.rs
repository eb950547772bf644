//! # 聊天消息数据模型

use serde::Serialize;

/// 消息角色
///
/// 线上角色名有别名：`user` 等同于 `detective`，`assistant` 等同于 `suspect`。
/// 未识别的角色按系统消息处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    Detective,
    Suspect,
}

impl ChatRole {
    pub fn from_wire(role: &str) -> Self {
        match role.to_ascii_lowercase().as_str() {
            "user" | "detective" => ChatRole::Detective,
            "assistant" | "suspect" => ChatRole::Suspect,
            _ => ChatRole::System,
        }
    }

    /// 是否使用逐字显示（打字效果）
    pub fn is_typed(self) -> bool {
        matches!(self, ChatRole::Suspect)
    }
}

/// 聊天消息：追加后不再修改、不会删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    /// 显示名：提供了名字则为名字的大写形式，否则为角色名的大写形式
    pub display_name: String,
    pub text: String,
}

impl ChatMessage {
    /// 按线上角色与可选名字构造消息
    pub fn new(role: &str, text: impl Into<String>, name: Option<&str>) -> Self {
        let display_name = match name {
            Some(n) if !n.trim().is_empty() => n.to_uppercase(),
            _ => role.to_uppercase(),
        };
        Self {
            role: ChatRole::from_wire(role),
            display_name,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new("system", text, Some("System"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases() {
        assert_eq!(ChatRole::from_wire("user"), ChatRole::Detective);
        assert_eq!(ChatRole::from_wire("Assistant"), ChatRole::Suspect);
        assert_eq!(ChatRole::from_wire("narrator"), ChatRole::System);
    }

    #[test]
    fn test_display_name_falls_back_to_role() {
        let msg = ChatMessage::new("suspect", "I was at home.", None);
        assert_eq!(msg.display_name, "SUSPECT");
        let msg = ChatMessage::new("suspect", "I was at home.", Some("Clara Voss"));
        assert_eq!(msg.display_name, "CLARA VOSS");
    }
}
