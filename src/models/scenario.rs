//! # 案件剧本数据模型
//!
//! 定义了服务端在 `init_game` 事件中下发的案件剧本（Scenario）、受害者（Victim）、
//! 嫌疑人（Suspect）以及静态头像目录条目（PortraitDescriptor）。
//!
//! 服务端由 Python 实现，线上字段统一为 snake_case，因此这里不做 `rename_all`。
//! 剧本在会话初始化后不可变，唯一允许的修改是把嫌疑人标记为已排除（`eliminated`）。

use serde::{Deserialize, Serialize};

/// 案件剧本
///
/// 初始化后只读；嫌疑人顺序即服务端下发顺序，头像的位置默认值依赖该顺序。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// 案件标题，如 "The Gallery Poisoning"
    pub title: String,

    /// 受害者信息
    pub victim: Victim,

    /// 嫌疑人列表（有序，ID 在剧本内唯一）
    pub suspects: Vec<Suspect>,
}

/// 受害者信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Victim {
    pub name: String,
    pub age: u32,
    pub occupation: String,
    pub time_of_death: String,
    /// 案发地点：服务端可能不提供
    #[serde(default)]
    pub location: Option<String>,
}

/// 嫌疑人
///
/// 从不被移除，错误指控后只会把 `eliminated` 置为 true。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suspect {
    /// 剧本内唯一的嫌疑人 ID，如 "suspect_1"
    pub id: String,
    pub name: String,
    /// 身份描述，如 "Gallery Curator"，头像原型推导的依据
    pub role: String,
    pub phone_number: String,
    /// 性别：缺失时头像解析直接走位置默认值
    #[serde(default)]
    pub gender: Option<String>,
    /// 是否已被排除（错误指控后为 true）
    #[serde(default)]
    pub eliminated: bool,
    /// 不在场证明联系人 ID（服务端按 "ALIBI-1xx" 规则合成）
    #[serde(default)]
    pub alibi_id: Option<String>,
}

/// 头像目录条目
///
/// 由静态侧文件提供，会话开始时加载一次，之后只读。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortraitDescriptor {
    /// 资源标识符（图片 ID）
    pub id: String,
    pub gender: String,
    /// 原型：executive / worker / artist / socialite / criminal / customer / detective
    pub archetype: String,
}

impl Scenario {
    /// 按 ID 查找嫌疑人
    pub fn suspect(&self, suspect_id: &str) -> Option<&Suspect> {
        self.suspects.iter().find(|s| s.id == suspect_id)
    }

    /// 按 ID 查找嫌疑人（可变引用），仅用于设置 `eliminated`
    pub fn suspect_mut(&mut self, suspect_id: &str) -> Option<&mut Suspect> {
        self.suspects.iter_mut().find(|s| s.id == suspect_id)
    }

    /// 嫌疑人在剧本中的位置序号
    pub fn suspect_index(&self, suspect_id: &str) -> Option<usize> {
        self.suspects.iter().position(|s| s.id == suspect_id)
    }
}
