//! # 路径工具函数
//!
//! 提供与客户端配置目录相关的路径函数：
//! - 获取客户端配置目录（`~/.murder-ai/`）
//! - 获取客户端配置文件路径（`~/.murder-ai/client-config.json`）

use std::path::PathBuf;

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "client-config.json";

/// 获取客户端配置目录的绝对路径
///
/// 客户端配置独立存储在用户主目录下的 `.murder-ai` 文件夹中，
/// 使用 `dirs` crate 获取跨平台的主目录路径。
///
/// # 错误
/// 如果无法确定用户主目录（极端情况，如无 HOME 环境变量），返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\.murder-ai`
/// - Linux/macOS: `/home/username/.murder-ai`
pub fn get_client_config_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
    Ok(home.join(".murder-ai"))
}

/// 获取客户端配置文件的绝对路径
pub fn get_client_config_path() -> Result<PathBuf, String> {
    Ok(get_client_config_dir()?.join(CONFIG_FILE_NAME))
}
