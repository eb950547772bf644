//! # 通用工具函数
//!
//! - `path` - 客户端配置目录定位
//! - `html` - HTML 转义与标签剥离

pub mod html;
pub mod path;
