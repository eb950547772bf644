//! # 核心服务模块
//!
//! 按依赖顺序（叶子在前）：
//! - `scheduler` - 逻辑定时器（握手重试、逐字显示、工具结果自动关闭）
//! - `handshake` - 就绪握手：启动即发送 `ready`，按固定间隔重试直到收到 `init_game`
//! - `bridge` - 桥接传输与事件解码
//! - `portraits` - 嫌疑人头像解析（纯函数）
//! - `catalog` - 头像目录加载
//! - `board` - 证据聚合：新建或合并证据板卡片
//! - `tool_format` - 工具结果的 Markdown 格式化
//! - `tool_machine` - 工具交互状态机
//! - `chat` - 聊天记录与逐字显示
//! - `session_store` - 会话快照归约
//! - `client` - 组合以上组件的状态归约核心
//! - `runtime` - 驱动客户端的异步主循环

pub mod board;
pub mod bridge;
pub mod catalog;
pub mod chat;
pub mod client;
pub mod handshake;
pub mod portraits;
pub mod runtime;
pub mod scheduler;
pub mod session_store;
pub mod tool_format;
pub mod tool_machine;
