//! # 工具结果格式化服务
//!
//! 把工具返回的原始结果（`details` 对象）格式化为 Markdown，
//! 用于工具面板在 `Result` 状态下的内联展示。
//!
//! 每个工具有固定的版式；字段缺失时显示占位符而不是报错，
//! 未知工具直接输出紧凑 JSON。

use serde_json::Value;

use crate::models::event::ServerEvent;
use crate::models::tool::ToolName;
use crate::utils::html::strip_tags;

/// 从 JSON 对象中读取字符串字段（数字等标量也转为字符串）
fn text(details: &Value, key: &str) -> Option<String> {
    match details.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 读取字符串数组字段并以 ", " 连接
fn joined(details: &Value, key: &str) -> Option<String> {
    let items: Vec<String> = details
        .get(key)?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .collect();
    Some(items.join(", "))
}

/// 按工具版式格式化结果
pub fn format_tool_result(tool: ToolName, details: &Value) -> String {
    if let Some(error) = text(details, "error") {
        return format!("❌ **Error:** {}", error);
    }

    let mut out = String::new();
    match tool {
        ToolName::GetLocation => {
            out.push_str("### 📍 Location Data\n");
            if let Some(history) = details.get("history").and_then(Value::as_array) {
                out.push_str("**Movement History:**\n");
                for entry in history {
                    let line = entry.as_str().map(str::to_string).unwrap_or_else(|| entry.to_string());
                    out.push_str(&format!("- {}\n", line));
                }
            } else {
                if let Some(time) = text(details, "timestamp") {
                    out.push_str(&format!("- **Time:** {}\n", time));
                }
                if let Some(place) = text(details, "description") {
                    out.push_str(&format!("- **Location:** {}\n", place));
                }
                if let Some(coords) = text(details, "coordinates") {
                    out.push_str(&format!("- **Coordinates:** {}\n", coords));
                }
                if let Some(accuracy) = text(details, "accuracy") {
                    out.push_str(&format!("- **Accuracy:** {}\n", accuracy));
                }
            }
        }
        ToolName::GetFootage => {
            out.push_str("### 📹 CCTV Analysis\n");
            out.push_str(&format!(
                "- **Location:** {}\n",
                text(details, "location").unwrap_or_else(|| "Unknown".to_string())
            ));
            out.push_str(&format!(
                "- **Time:** {}\n",
                text(details, "time_range").unwrap_or_else(|| "N/A".to_string())
            ));
            out.push_str(&format!(
                "- **Quality:** {}\n",
                text(details, "quality").unwrap_or_else(|| "N/A".to_string())
            ));
            if let Some(people) = joined(details, "visible_people") {
                out.push_str(&format!("- **Visible:** {}\n", people));
            }
            if let Some(key_details) = text(details, "key_details") {
                out.push_str(&format!("- **Key Details:** {}\n", key_details));
            }
        }
        ToolName::GetDnaTest => {
            out.push_str("### 🧬 DNA Analysis\n");
            out.push_str(&format!(
                "**Sample ID:** {}\n",
                text(details, "evidence_id").unwrap_or_else(|| "Unknown".to_string())
            ));
            if let Some(result) = text(details, "result") {
                out.push_str(&format!("**Result:** {}\n", result));
            }
            if let Some(matched) = text(details, "match").or_else(|| text(details, "primary_match")) {
                out.push_str(&format!("**Match:** {}\n", matched));
            }
            if let Some(confidence) = text(details, "confidence") {
                out.push_str(&format!("**Confidence:** {}\n", confidence));
            }
            if let Some(notes) = text(details, "notes") {
                out.push_str(&format!("**Notes:** {}\n", notes));
            }
        }
        ToolName::CallAlibi => {
            out.push_str("### 📞 Alibi Check\n");
            if let Some(contact) = text(details, "contact_name") {
                out.push_str(&format!("**Contact:** {}\n", contact));
            }
            if let Some(status) = text(details, "status").or_else(|| text(details, "confidence")) {
                out.push_str(&format!("**Status:** {}\n", status));
            }
            if let Some(statement) = text(details, "statement").or_else(|| text(details, "response")) {
                out.push_str(&format!("**Statement:** \"{}\"\n", statement));
            }
            if let Some(flags) = joined(details, "red_flags").filter(|f| !f.is_empty()) {
                out.push_str(&format!("**Red Flags:** {}\n", flags));
            }
        }
        ToolName::Accuse => {
            out = details.to_string();
        }
    }
    out
}

/// 工具会话 `Result` 状态下的内联摘要
///
/// - 证据事件：有 `details` 时按工具版式格式化，否则显示证据标题与纯文本正文
/// - 指控结果（轮次失败/对局结束）：显示服务端消息
/// - 其他事件：显示事件名
pub fn summarize(tool: ToolName, event: &ServerEvent) -> String {
    match event {
        ServerEvent::AddEvidence(fragment) => match &fragment.details {
            Some(details) => format_tool_result(tool, details),
            None => {
                let title = fragment.title.as_deref().unwrap_or("Evidence");
                let body = strip_tags(fragment.body());
                if body.is_empty() {
                    format!("**{}**", title)
                } else {
                    format!("**{}**\n{}", title, body)
                }
            }
        },
        ServerEvent::RoundFailure(payload) => payload.message.clone(),
        ServerEvent::GameOver(payload) => payload.message.clone(),
        ServerEvent::UpdateStatus(payload) => payload
            .message
            .clone()
            .unwrap_or_else(|| "Status updated.".to_string()),
        other => format!("Received {}", other.name()),
    }
}
