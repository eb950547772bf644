//! # 终端命令解析
//!
//! 每行一条命令：
//!
//! | 命令 | 含义 |
//! |------|------|
//! | `select <id>` | 选择嫌疑人 |
//! | `say <text>` | 向当前嫌疑人问话 |
//! | `tool <name>` | 打开调查工具 |
//! | `set <field> <value>` | 修改工具字段（值可以包含空格） |
//! | `submit` / `close` | 提交 / 关闭工具 |
//! | `board` / `status` / `help` | 查看证据板 / 状态 / 帮助 |
//! | `quit` | 退出 |
//!
//! 不以命令词开头的非空行视为 `say`，方便直接对话。

use crate::models::tool::ToolName;
use crate::services::runtime::{UserCommand, View};

/// 解析一行输入
///
/// # 返回值
/// - `Ok(None)` - 空行
/// - `Ok(Some(command))` - 解析成功
///
/// # 错误
/// 命令缺少参数或工具名未知时返回错误信息
pub fn parse_line(line: &str) -> Result<Option<UserCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "select" => UserCommand::Select(required(rest, "select <suspect_id>")?.to_string()),
        "say" => UserCommand::Say(required(rest, "say <text>")?.to_string()),
        "tool" => UserCommand::OpenTool(required(rest, "tool <name>")?.parse::<ToolName>()?),
        "set" => {
            let args = required(rest, "set <field> <value>")?;
            let (name, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            UserCommand::SetField {
                name: name.to_string(),
                value: value.trim().to_string(),
            }
        }
        "submit" => UserCommand::Submit,
        "close" => UserCommand::Close,
        "board" => UserCommand::Show(View::Board),
        "status" => UserCommand::Show(View::Status),
        "help" | "?" => UserCommand::Show(View::Help),
        "quit" | "exit" => UserCommand::Quit,
        _ => UserCommand::Say(line.to_string()),
    };
    Ok(Some(command))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("用法: {}", usage))
    } else {
        Ok(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_spaces_in_value() {
        assert_eq!(
            parse_line("set question  Were you with her at 8?").unwrap(),
            Some(UserCommand::SetField {
                name: "question".to_string(),
                value: "Were you with her at 8?".to_string(),
            })
        );
    }

    #[test]
    fn test_tool_names_are_checked() {
        assert_eq!(
            parse_line("tool get_dna_test").unwrap(),
            Some(UserCommand::OpenTool(ToolName::GetDnaTest))
        );
        assert!(parse_line("tool lockpick").is_err());
        assert!(parse_line("select").is_err());
    }

    #[test]
    fn test_free_text_is_chat() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(
            parse_line("Where were you last night?").unwrap(),
            Some(UserCommand::Say("Where were you last night?".to_string()))
        );
    }
}
