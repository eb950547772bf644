//! # 客户端配置读写
//!
//! - `read_config` / `save_config` - 读写 `~/.murder-ai/client-config.json`
//! - `load_config` - 读取配置并应用环境变量覆盖（启动时使用）
//!
//! 环境变量优先级高于配置文件：
//! - `MURDER_AI_SERVER_URL` → `serverUrl`
//! - `MURDER_AI_PORTRAITS` → `portraitCatalog`

use std::path::Path;

use crate::models::settings::ClientConfig;
use crate::utils::path;

/// 服务端地址覆盖变量
pub const ENV_SERVER_URL: &str = "MURDER_AI_SERVER_URL";

/// 头像目录来源覆盖变量
pub const ENV_PORTRAITS: &str = "MURDER_AI_PORTRAITS";

/// 从指定路径读取客户端配置
///
/// 文件不存在（首次运行）时返回默认配置。
///
/// # 错误
/// 文件存在但无法读取或 JSON 解析失败时返回错误
pub async fn read_config(config_path: &Path) -> Result<ClientConfig, String> {
    if !config_path.exists() {
        return Ok(ClientConfig::default());
    }

    let content = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|e| format!("读取配置文件失败: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("解析配置文件失败: {}", e))
}

/// 保存客户端配置到指定路径
///
/// 以 2 空格缩进的 JSON 写入，父目录不存在时递归创建。
///
/// # 错误
/// 目录创建失败、序列化失败或文件写入失败时返回错误
pub async fn save_config(config_path: &Path, config: &ClientConfig) -> Result<(), String> {
    if let Some(dir) = config_path.parent() {
        if !dir.exists() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| format!("创建配置目录失败: {}", e))?;
        }
    }

    let content =
        serde_json::to_string_pretty(config).map_err(|e| format!("序列化配置失败: {}", e))?;

    tokio::fs::write(config_path, content)
        .await
        .map_err(|e| format!("写入配置文件失败: {}", e))
}

/// 应用环境变量覆盖
///
/// `lookup` 通常为 `std::env::var(..).ok()`，测试中替换为固定映射。空值不覆盖。
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(ENV_SERVER_URL) {
        config.server_url = url;
    }
    if let Some(source) = non_empty(ENV_PORTRAITS) {
        config.portrait_catalog = Some(source);
    }
    config
}

/// 启动时加载配置：默认位置的配置文件 + 环境变量覆盖
///
/// 首次运行时把默认配置写入磁盘，便于用户修改；写入失败只记录警告。
/// 无法确定主目录时直接使用默认配置。
pub async fn load_config() -> Result<ClientConfig, String> {
    let config = match path::get_client_config_path() {
        Ok(config_path) if !config_path.exists() => {
            let config = ClientConfig::default();
            match save_config(&config_path, &config).await {
                Ok(()) => log::info!("已生成默认配置: {}", config_path.display()),
                Err(e) => log::warn!("{}", e),
            }
            config
        }
        Ok(config_path) => read_config(&config_path).await?,
        Err(e) => {
            log::warn!("{}，使用默认配置", e);
            ClientConfig::default()
        }
    };
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}
