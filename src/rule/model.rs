//! 分类规则数据模型定义
//! 仅存储规则数据，无任何业务逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// 中性灰色（自定义分类缺省显示色）
pub const NEUTRAL_COLOR: &str = "#6b7280";
/// 中性灰色（自定义分类缺省标签组色）
pub const NEUTRAL_GROUP_COLOR: &str = "grey";

/// 分类定义（内置分类与自定义分类共用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub key: String,
    pub name: String,
    pub color: String,
    pub group_color: String,
    /// 小写、无协议头的域名列表
    #[serde(default)]
    pub domains: Vec<String>,
    /// 小写关键词列表
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Category {
    /// 从静态规则表构建内置分类
    pub fn builtin(
        key: &str,
        name: &str,
        color: &str,
        group_color: &str,
        domains: &[&str],
        keywords: &[&str],
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            group_color: group_color.to_string(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// 是否没有任何域名/关键词规则（兜底分类或空自定义分类）
    pub fn is_empty_rule(&self) -> bool {
        self.domains.is_empty() && self.keywords.is_empty()
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            key: self.key.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}

/// 用户自定义分类的原始描述（宿主存储中的松散结构）
/// 所有字段均可缺失或类型不符，由注册表合并时统一归一化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCategoryDescriptor {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group_color: Option<String>,
    // 兼容：非数组或含非字符串元素的写法
    #[serde(default)]
    pub domains: Option<Value>,
    #[serde(default)]
    pub keywords: Option<Value>,
}

impl CustomCategoryDescriptor {
    /// 从任意JSON值构建，非对象条目视为空描述
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            warn!("自定义分类条目不是对象，按空分类处理：{}", value);
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("自定义分类条目解析失败，按空分类处理：{}", e);
            Self::default()
        })
    }

    /// 解析 `customCategories` 设置值，非数组时为空列表
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            Value::Null => Vec::new(),
            other => {
                warn!("customCategories 不是数组，已忽略：{}", other);
                Vec::new()
            }
        }
    }
}

/// 宽松读取字符串：数字转为字符串，其余类型视为缺失
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// 分类摘要（供展示层列出全部分类）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub key: String,
    pub name: String,
    pub color: String,
}
