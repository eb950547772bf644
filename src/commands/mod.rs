//! # 终端前端模块
//!
//! - `input` - 把标准输入的一行解析为用户命令
//! - `terminal` - 把显示事件渲染为文本
//! - `settings` - 客户端配置的读写与环境变量覆盖

pub mod input;
pub mod settings;
pub mod terminal;
