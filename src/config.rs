//! 全局配置管理
//! 宿主传入的松散设置在此统一补全默认值，下游逻辑只读取 `Settings`

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::rule::CustomCategoryDescriptor;

/// 默认不活跃小时数
pub const DEFAULT_INACTIVE_HOURS: u32 = 24;

/// 默认视为浏览器内部页面的协议
pub const DEFAULT_INTERNAL_SCHEMES: &[&str] = &["chrome", "chrome-extension", "edge", "about", "moz-extension", "devtools"];

/// 分类级别的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryAction {
    Keep,
    Close,
    Bookmark,
    #[default]
    Ask,
}

impl CategoryAction {
    /// 解析配置值，未知取值按 `ask` 处理
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "keep" => Self::Keep,
            "close" => Self::Close,
            "bookmark" => Self::Bookmark,
            "ask" => Self::Ask,
            other => {
                warn!("未知的分类处理方式：{}，按 ask 处理", other);
                Self::Ask
            }
        }
    }

    /// close 或 ask 时允许自动关闭
    pub fn allows_close(self) -> bool {
        matches!(self, Self::Close | Self::Ask)
    }
}

impl fmt::Display for CategoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Keep => "keep",
            Self::Close => "close",
            Self::Bookmark => "bookmark",
            Self::Ask => "ask",
        };
        f.write_str(s)
    }
}

/// 书签保存位置（仅书签放置方使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkSaveLocation {
    #[default]
    CategoryFolder,
    BookmarkBar,
    OtherBookmarks,
}

/// 分类文件夹的父目录（仅书签放置方使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkFolderParent {
    BookmarkBar,
    #[default]
    OtherBookmarks,
}

/// 宿主存储中的原始设置（所有字段可缺失，类型不符时回退默认值）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    // 兼容：数字或数字字符串
    #[serde(default)]
    pub inactive_hours: Option<Value>,
    #[serde(default)]
    pub auto_close_old_tabs: Option<Value>,
    #[serde(default)]
    pub auto_bookmark_docs: Option<Value>,
    #[serde(default)]
    pub category_actions: Option<Value>,
    #[serde(default)]
    pub custom_categories: Option<Value>,
    #[serde(default)]
    pub bookmark_save_location: Option<Value>,
    #[serde(default)]
    pub bookmark_folder_parent: Option<Value>,
    #[serde(default)]
    pub internal_schemes: Option<Value>,
}

/// 补全默认值后的设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSettings", rename_all = "camelCase")]
pub struct Settings {
    pub inactive_hours: u32,
    pub auto_close_old_tabs: bool,
    pub auto_bookmark_docs: bool,
    pub category_actions: BTreeMap<String, CategoryAction>,
    pub custom_categories: Vec<CustomCategoryDescriptor>,
    pub bookmark_save_location: BookmarkSaveLocation,
    pub bookmark_folder_parent: BookmarkFolderParent,
    pub internal_schemes: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inactive_hours: DEFAULT_INACTIVE_HOURS,
            auto_close_old_tabs: true,
            auto_bookmark_docs: true,
            category_actions: BTreeMap::new(),
            custom_categories: Vec::new(),
            bookmark_save_location: BookmarkSaveLocation::default(),
            bookmark_folder_parent: BookmarkFolderParent::default(),
            internal_schemes: DEFAULT_INTERNAL_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// 唯一的默认值补全入口
    pub fn from_raw(raw: RawSettings) -> Self {
        let defaults = Self::default();

        Self {
            inactive_hours: parse_inactive_hours(raw.inactive_hours.as_ref()),
            auto_close_old_tabs: parse_bool(raw.auto_close_old_tabs.as_ref(), "autoCloseOldTabs")
                .unwrap_or(defaults.auto_close_old_tabs),
            auto_bookmark_docs: parse_bool(raw.auto_bookmark_docs.as_ref(), "autoBookmarkDocs")
                .unwrap_or(defaults.auto_bookmark_docs),
            category_actions: parse_category_actions(raw.category_actions.as_ref()),
            custom_categories: raw
                .custom_categories
                .as_ref()
                .map(CustomCategoryDescriptor::list_from_value)
                .unwrap_or_default(),
            bookmark_save_location: raw
                .bookmark_save_location
                .as_ref()
                .and_then(parse_enum)
                .unwrap_or(defaults.bookmark_save_location),
            bookmark_folder_parent: raw
                .bookmark_folder_parent
                .as_ref()
                .and_then(parse_enum)
                .unwrap_or(defaults.bookmark_folder_parent),
            internal_schemes: match raw.internal_schemes {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
                _ => defaults.internal_schemes,
            },
        }
    }

    /// 分类配置的处理方式，未配置时为 `ask`
    pub fn category_action(&self, category: &str) -> CategoryAction {
        self.category_actions.get(category).copied().unwrap_or_default()
    }

    /// 是否为浏览器内部页面或扩展页面
    pub fn is_internal_url(&self, url: &str) -> bool {
        let lower = url.trim_start().to_lowercase();
        self.internal_schemes.iter().any(|scheme| {
            lower
                .strip_prefix(scheme.as_str())
                .is_some_and(|rest| rest.starts_with(':'))
        })
    }
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        Self::from_raw(raw)
    }
}

/// 不活跃小时数：缺失、非数字或非正数时取默认值
fn parse_inactive_hours(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.trunc() as i64),
        Some(Value::String(s)) => leading_integer(s),
        _ => None,
    };

    match parsed {
        Some(hours) if hours > 0 => u32::try_from(hours).unwrap_or(u32::MAX),
        Some(hours) => {
            warn!("inactiveHours={} 无效，使用默认值{}", hours, DEFAULT_INACTIVE_HOURS);
            DEFAULT_INACTIVE_HOURS
        }
        None => DEFAULT_INACTIVE_HOURS,
    }
}

/// 解析字符串开头的整数（"12h" -> 12）
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn parse_enum<T: for<'de> Deserialize<'de>>(value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    let parsed = serde_json::from_value(value.clone()).ok();
    if parsed.is_none() {
        warn!("无法识别的设置取值：{}，使用默认值", value);
    }
    parsed
}

fn parse_bool(value: Option<&Value>, field: &str) -> Option<bool> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            warn!("{} 不是布尔值：{}，使用默认值", field, other);
            None
        }
    }
}

/// 分类处理方式：非字符串取值按 `ask` 处理
fn parse_category_actions(value: Option<&Value>) -> BTreeMap<String, CategoryAction> {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, action)| {
                let action = match action.as_str() {
                    Some(s) => CategoryAction::parse(s),
                    None => CategoryAction::Ask,
                };
                (key.clone(), action)
            })
            .collect(),
        None | Some(Value::Null) => BTreeMap::new(),
        Some(other) => {
            warn!("categoryActions 不是对象，已忽略：{}", other);
            BTreeMap::new()
        }
    }
}

/// 设置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    pub fn inactive_hours(mut self, hours: u32) -> Self {
        self.settings.inactive_hours = if hours == 0 { DEFAULT_INACTIVE_HOURS } else { hours };
        self
    }

    pub fn auto_close_old_tabs(mut self, enabled: bool) -> Self {
        self.settings.auto_close_old_tabs = enabled;
        self
    }

    pub fn auto_bookmark_docs(mut self, enabled: bool) -> Self {
        self.settings.auto_bookmark_docs = enabled;
        self
    }

    pub fn category_action(mut self, category: impl Into<String>, action: CategoryAction) -> Self {
        self.settings.category_actions.insert(category.into(), action);
        self
    }

    pub fn custom_category(mut self, descriptor: CustomCategoryDescriptor) -> Self {
        self.settings.custom_categories.push(descriptor);
        self
    }

    pub fn bookmark_save_location(mut self, location: BookmarkSaveLocation) -> Self {
        self.settings.bookmark_save_location = location;
        self
    }

    pub fn bookmark_folder_parent(mut self, parent: BookmarkFolderParent) -> Self {
        self.settings.bookmark_folder_parent = parent;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
