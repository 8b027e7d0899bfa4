//! 分类结果数据模型

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::rule::Category;

/// 匹配置信度（由命中的规则层级决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(s)
    }
}

/// 单个标签页的分类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: String,
    pub category_name: String,
    pub color: String,
    pub confidence: Confidence,
    pub reason: String,
}

impl ClassificationResult {
    pub fn from_category(category: &Category, confidence: Confidence, reason: String) -> Self {
        Self {
            category: category.key.clone(),
            category_name: category.name.clone(),
            color: category.color.clone(),
            confidence,
            reason,
        }
    }
}
