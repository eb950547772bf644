//! # 头像目录加载服务
//!
//! 头像目录是一个静态侧文件（JSON 数组，每项含 `id` / `gender` / `archetype`），
//! 在客户端启动时加载一次。
//!
//! 加载失败（文件缺失、网络错误、格式错误）绝不阻止初始化：
//! 记录警告后返回空目录，头像解析随之走位置默认值路径。

use std::path::Path;
use std::time::Duration;

use crate::models::scenario::PortraitDescriptor;

/// 从配置的来源加载头像目录
///
/// # 参数
/// - `source` - `http(s)://` 开头按 URL 下载，否则按本地文件路径读取；None 表示不加载
///
/// # 返回值
/// 加载成功返回目录，任何失败都返回空数组
pub async fn load_catalog(source: Option<&str>) -> Vec<PortraitDescriptor> {
    let Some(source) = source.map(str::trim).filter(|s| !s.is_empty()) else {
        log::info!("未配置头像目录，使用位置默认头像");
        return vec![];
    };

    let result = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_catalog(source).await
    } else {
        read_catalog_file(Path::new(source)).await
    };

    match result {
        Ok(catalog) => {
            log::info!("已加载头像目录：{} 项（来源 {}）", catalog.len(), source);
            catalog
        }
        Err(e) => {
            log::warn!("加载头像目录失败，使用位置默认头像: {}", e);
            vec![]
        }
    }
}

/// 通过 HTTP 下载头像目录
async fn fetch_catalog(url: &str) -> Result<Vec<PortraitDescriptor>, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| format!("创建 HTTP 客户端失败: {}", e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("下载头像目录失败: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("下载头像目录失败: HTTP {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("读取头像目录响应失败: {}", e))?;

    parse_catalog(&body)
}

/// 从本地文件读取头像目录
async fn read_catalog_file(path: &Path) -> Result<Vec<PortraitDescriptor>, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("读取头像目录文件失败: {}", e))?;

    parse_catalog(&content)
}

/// 解析头像目录 JSON
///
/// 单个条目缺字段时整体失败：目录是部署时生成的静态文件，部分损坏说明文件不可信。
pub fn parse_catalog(content: &str) -> Result<Vec<PortraitDescriptor>, String> {
    serde_json::from_str(content).map_err(|e| format!("解析头像目录失败: {}", e))
}
