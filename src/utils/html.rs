//! # HTML 工具函数
//!
//! - `escape_html`：插入 HTML 片段前转义文本
//! - `strip_tags`：终端呈现时把 HTML 片段还原为纯文本

use std::sync::LazyLock;

use regex::Regex;

/// HTML 标签匹配正则
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// 块级标签（换行处理）匹配正则
static BLOCK_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</div>|<br\s*/?>|</p>|</li>").unwrap());

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 去除 HTML 标签，块级结束标签转为换行，并还原常见实体
pub fn strip_tags(html: &str) -> String {
    let with_breaks = BLOCK_BREAK_RE.replace_all(html, "\n");
    let text = TAG_RE.replace_all(&with_breaks, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
