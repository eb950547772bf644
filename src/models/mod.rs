//! # 数据模型模块
//!
//! 定义了与游戏服务端报文一一对应的 Rust 数据结构，以及引擎内部的状态与显示层事件。
//! 线上结构体派生 `Serialize` 和 `Deserialize`，显示层结构体只派生 `Serialize`。
//! - `scenario` - 案件剧本、嫌疑人、头像目录条目
//! - `event` - 桥接协议的出站动作与入站事件
//! - `evidence` - 证据片段与证据板卡片
//! - `chat` - 聊天消息
//! - `session` - 会话快照
//! - `tool` - 调查工具与工具会话状态
//! - `display` - 显示层事件
//! - `settings` - 客户端配置

pub mod chat;
pub mod display;
pub mod event;
pub mod evidence;
pub mod scenario;
pub mod session;
pub mod settings;
pub mod tool;
