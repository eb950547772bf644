//! # 头像解析服务
//!
//! 纯函数：嫌疑人 + 已加载的头像目录 → 稳定的图片资源 ID。
//! 不使用随机数、不发起网络请求，因此同一嫌疑人在任意次重绘、任意次重新加载客户端后
//! 都得到同一张头像，服务端无需下发分配结果。
//!
//! ## 解析步骤
//! 1. 目录为空或嫌疑人无性别 → 位置默认值 `suspect_{(index mod 8) + 1}`
//! 2. 按性别过滤（忽略大小写的完全匹配），为空 → 位置默认值
//! 3. 按身份关键词推导目标原型（规则有序，首个命中生效）
//! 4. 按原型过滤，为空则退回性别过滤后的全集
//! 5. 以姓名的 32 位滚动哈希对候选池取模，选出一项
//!
//! 哈希碰撞没有额外的平局规则：这里只保证确定性，不保证分配均匀。

use crate::models::scenario::{PortraitDescriptor, Suspect};

/// 位置默认头像的数量
const DEFAULT_PORTRAIT_COUNT: usize = 8;

/// 身份关键词 → 原型（按顺序匹配，首个命中生效）
///
/// `ex-` 前缀规则单独处理（见 [`archetype_for_role`]）。
const ARCHETYPE_RULES: &[(&[&str], &str)] = &[
    (&["ceo", "cfo", "manager", "dealer"], "executive"),
    (&["janitor", "chef", "caterer"], "worker"),
    (&["artist", "curator"], "artist"),
    (&["heir", "collector", "sister", "socialite"], "socialite"),
];

/// 未命中任何规则时的原型
const FALLBACK_ARCHETYPE: &str = "detective";

/// 位置默认头像 ID
pub fn positional_default(index: usize) -> String {
    format!("suspect_{}", (index % DEFAULT_PORTRAIT_COUNT) + 1)
}

/// 由身份描述推导目标原型
///
/// 规则顺序：高管 → 劳工 → 艺术 → 名流 → `ex-` 前缀（前科）→ 顾客 → 兜底（侦探）。
pub fn archetype_for_role(role: &str) -> &'static str {
    let role = role.trim().to_lowercase();

    for (keywords, archetype) in ARCHETYPE_RULES {
        if keywords.iter().any(|k| role.contains(k)) {
            return archetype;
        }
    }
    if role.starts_with("ex-") {
        return "criminal";
    }
    if role.contains("customer") {
        return "customer";
    }
    FALLBACK_ARCHETYPE
}

/// 32 位滚动哈希（`h = h * 31 + c`，按 UTF-16 码元，回绕运算）
///
/// 与网页前端的字符串哈希逐位一致，取绝对值后使用。
pub fn name_hash(name: &str) -> u32 {
    let hash = name.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs()
}

/// 解析嫌疑人的头像资源 ID
///
/// # 参数
/// - `suspect` - 嫌疑人
/// - `index` - 嫌疑人在剧本中的位置（用于位置默认值）
/// - `catalog` - 头像目录（可能为空）
pub fn resolve_portrait(suspect: &Suspect, index: usize, catalog: &[PortraitDescriptor]) -> String {
    let gender = match suspect.gender.as_deref().map(str::trim) {
        Some(g) if !g.is_empty() && !catalog.is_empty() => g,
        _ => return positional_default(index),
    };

    let gender_matched: Vec<&PortraitDescriptor> = catalog
        .iter()
        .filter(|p| p.gender.eq_ignore_ascii_case(gender))
        .collect();
    if gender_matched.is_empty() {
        return positional_default(index);
    }

    let target = archetype_for_role(&suspect.role);
    let archetype_matched: Vec<&PortraitDescriptor> = gender_matched
        .iter()
        .copied()
        .filter(|p| p.archetype.eq_ignore_ascii_case(target))
        .collect();
    let pool = if archetype_matched.is_empty() {
        gender_matched
    } else {
        archetype_matched
    };

    let pick = name_hash(&suspect.name) as usize % pool.len();
    pool[pick].id.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suspect(name: &str, role: &str, gender: Option<&str>) -> Suspect {
        Suspect {
            id: "suspect_1".to_string(),
            name: name.to_string(),
            role: role.to_string(),
            phone_number: "555-0101".to_string(),
            gender: gender.map(str::to_string),
            eliminated: false,
            alibi_id: None,
        }
    }

    fn portrait(id: &str, gender: &str, archetype: &str) -> PortraitDescriptor {
        PortraitDescriptor {
            id: id.to_string(),
            gender: gender.to_string(),
            archetype: archetype.to_string(),
        }
    }

    fn catalog() -> Vec<PortraitDescriptor> {
        vec![
            portrait("f_exec_1", "female", "executive"),
            portrait("f_exec_2", "female", "executive"),
            portrait("f_artist_1", "female", "artist"),
            portrait("m_worker_1", "male", "worker"),
            portrait("m_det_1", "male", "detective"),
        ]
    }

    #[test]
    fn test_archetype_rules_first_match_wins() {
        assert_eq!(archetype_for_role("CEO of Voss Holdings"), "executive");
        assert_eq!(archetype_for_role("Head Chef"), "worker");
        assert_eq!(archetype_for_role("Gallery Curator"), "artist");
        assert_eq!(archetype_for_role("Victim's Sister"), "socialite");
        assert_eq!(archetype_for_role("Ex-convict"), "criminal");
        assert_eq!(archetype_for_role("Regular customer"), "customer");
        assert_eq!(archetype_for_role("Night watchman"), "detective");
        // "art dealer" 同时含 artist 之外的 dealer：高管规则排在前面
        assert_eq!(archetype_for_role("Art dealer"), "executive");
    }

    #[test]
    fn test_positional_default_without_gender_or_catalog() {
        let s = suspect("Clara Voss", "CEO", None);
        assert_eq!(resolve_portrait(&s, 0, &catalog()), "suspect_1");
        let s = suspect("Clara Voss", "CEO", Some("female"));
        assert_eq!(resolve_portrait(&s, 9, &[]), "suspect_2");
    }

    #[test]
    fn test_positional_default_when_gender_unmatched() {
        let s = suspect("Sam Reyes", "Chef", Some("nonbinary"));
        assert_eq!(resolve_portrait(&s, 3, &catalog()), "suspect_4");
    }

    #[test]
    fn test_archetype_filter_and_fallback() {
        let s = suspect("Clara Voss", "CFO", Some("FEMALE"));
        let id = resolve_portrait(&s, 0, &catalog());
        assert!(id == "f_exec_1" || id == "f_exec_2");

        // 没有女性劳工头像：退回全部女性头像
        let s = suspect("Dana Holt", "Caterer", Some("female"));
        let id = resolve_portrait(&s, 0, &catalog());
        assert!(id.starts_with("f_"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let s = suspect("Marcus Hale", "Janitor", Some("male"));
        let first = resolve_portrait(&s, 2, &catalog());
        for _ in 0..10 {
            assert_eq!(resolve_portrait(&s, 2, &catalog()), first);
        }
        assert_eq!(first, "m_worker_1");
    }

    #[test]
    fn test_name_hash_matches_reference_values() {
        assert_eq!(name_hash(""), 0);
        // "a" = 97
        assert_eq!(name_hash("a"), 97);
        // "ab" = 97 * 31 + 98
        assert_eq!(name_hash("ab"), 3105);
    }
}
