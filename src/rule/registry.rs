//! 分类注册表
//! 合并用户自定义分类与内置分类，生成分类时使用的有效规则集

use std::collections::HashMap;
use tracing::{debug, warn};

use super::builtin::keys::OTHER;
use super::model::{Category, CategorySummary, CustomCategoryDescriptor, NEUTRAL_COLOR, NEUTRAL_GROUP_COLOR};

/// 有效分类注册表
/// 迭代顺序即插入顺序：自定义分类在前，内置分类在后；
/// 键冲突时内置分类在原位置覆盖自定义分类
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    entries: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 仅含内置分类的注册表
    pub fn from_builtin(builtin: &[Category]) -> Self {
        merge_categories(builtin, &[])
    }

    /// 插入分类：已存在的键在原位置替换，新键追加到末尾
    pub fn insert(&mut self, category: Category) {
        match self.index.get(&category.key) {
            Some(&pos) => self.entries[pos] = category,
            None => {
                self.index.insert(category.key.clone(), self.entries.len());
                self.entries.push(category);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// 按注册表顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 兜底分类（可能因配置错误缺失）
    pub fn fallback(&self) -> Option<&Category> {
        self.get(OTHER)
    }

    /// 标签组颜色，未知分类返回灰色
    pub fn group_color(&self, key: &str) -> &str {
        self.get(key)
            .map(|c| c.group_color.as_str())
            .unwrap_or(NEUTRAL_GROUP_COLOR)
    }

    /// 全部分类摘要（注册表顺序）
    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.entries.iter().map(Category::summary).collect()
    }
}

/// 分类对应的浏览器标签组颜色
pub fn group_color_for<'a>(key: &str, registry: &'a CategoryRegistry) -> &'a str {
    registry.group_color(key)
}

/// 合并内置分类与自定义分类
/// 1. 自定义分类先插入（缺失字段填充安全默认值）
/// 2. 内置分类最后覆盖，同键时内置分类生效
pub fn merge_categories(builtin: &[Category], custom_list: &[CustomCategoryDescriptor]) -> CategoryRegistry {
    let mut registry = CategoryRegistry::new();

    for (position, descriptor) in custom_list.iter().enumerate() {
        let category = normalize_custom(descriptor, position, &registry);
        if category.is_empty_rule() {
            debug!("自定义分类 {} 没有域名和关键词，仅参与展示", category.key);
        }
        registry.insert(category);
    }

    for category in builtin {
        if registry.contains(&category.key) {
            warn!("自定义分类键 {} 与内置分类冲突，以内置分类为准", category.key);
        }
        registry.insert(category.clone());
    }

    debug!(
        "分类注册表合并完成，自定义{}个，内置{}个，有效{}个",
        custom_list.len(),
        builtin.len(),
        registry.len()
    );
    registry
}

/// 归一化单个自定义分类描述
fn normalize_custom(descriptor: &CustomCategoryDescriptor, position: usize, registry: &CategoryRegistry) -> Category {
    let key = match non_empty(&descriptor.id) {
        Some(id) => id.to_string(),
        None => fallback_key(position, registry),
    };

    Category {
        name: non_empty(&descriptor.name).unwrap_or("Custom").to_string(),
        color: non_empty(&descriptor.color).unwrap_or(NEUTRAL_COLOR).to_string(),
        group_color: non_empty(&descriptor.group_color).unwrap_or(NEUTRAL_GROUP_COLOR).to_string(),
        domains: clean_term_list(descriptor.domains.as_ref(), &key, "domains"),
        keywords: clean_term_list(descriptor.keywords.as_ref(), &key, "keywords"),
        key,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 生成唯一的兜底键（确定性：按位置编号，冲突则递增）
fn fallback_key(position: usize, registry: &CategoryRegistry) -> String {
    let mut n = position;
    loop {
        let key = format!("CUSTOM_{}", n);
        if !registry.contains(&key) {
            return key;
        }
        n += 1;
    }
}

/// 清洗域名/关键词列表：去空白、转小写、丢弃空项
fn clean_term_list(value: Option<&serde_json::Value>, key: &str, field: &str) -> Vec<String> {
    match value {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(other) => {
            warn!("自定义分类 {} 的 {} 不是数组，已忽略：{}", key, field, other);
            Vec::new()
        }
    }
}
