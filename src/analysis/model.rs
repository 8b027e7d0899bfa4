//! 标签页输入与分析结果数据模型
//! 输入由宿主提供且只读，输出每次分析重新生成

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::advisor::{Action, ActionSuggestion};
use crate::classifier::{ClassificationResult, Confidence};
use crate::rule::CategorySummary;

/// 宿主提供的标签页（只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: i64,
    pub window_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    // 缺失或为 null 时视为空标题
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pinned: bool,
    /// 最近访问时间（毫秒时间戳）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<f64>,
}

impl Tab {
    /// 快速创建（其余字段取默认值）
    pub fn new(id: i64, window_id: i64, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            window_id,
            url: url.into(),
            title: title.into(),
            fav_icon_url: None,
            active: false,
            pinned: false,
            last_accessed: None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 单个标签页的分析记录：标签页字段 + 分类结果 + 处理建议 + 重复信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: i64,
    pub window_id: i64,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    pub active: bool,
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<f64>,

    pub category: String,
    pub category_name: String,
    pub color: String,
    pub confidence: Confidence,
    /// 分类原因（`reason` 字段留给处理建议）
    pub category_reason: String,

    pub action: Action,
    pub reason: String,
    pub priority: u32,

    pub is_duplicate: bool,
    /// 所在重复组的大小，非重复为1
    pub duplicate_count: usize,
}

impl TabRecord {
    pub fn new(tab: &Tab, classification: ClassificationResult, suggestion: ActionSuggestion, group_size: usize) -> Self {
        let is_duplicate = group_size > 1;
        Self {
            id: tab.id,
            window_id: tab.window_id,
            title: tab.title.clone(),
            url: tab.url.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
            active: tab.active,
            pinned: tab.pinned,
            last_accessed: tab.last_accessed,
            category: classification.category,
            category_name: classification.category_name,
            color: classification.color,
            confidence: classification.confidence,
            category_reason: classification.reason,
            action: suggestion.action,
            reason: suggestion.reason,
            priority: suggestion.priority,
            is_duplicate,
            duplicate_count: if is_duplicate { group_size } else { 1 },
        }
    }
}

/// 重复组中的标签页摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub id: i64,
    pub title: String,
    pub window_id: i64,
}

/// 归一化URL相同的一组标签页（至少2个）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    #[serde(alias = "url")]
    pub normalized_url: String,
    pub tab_ids: Vec<i64>,
    pub count: usize,
    pub tabs: Vec<TabSummary>,
}

/// 按处理方式计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    pub keep: usize,
    pub close: usize,
    pub bookmark: usize,
}

impl ActionCounts {
    pub fn increment(&mut self, action: Action) {
        *self.slot(action) += 1;
    }

    fn slot(&mut self, action: Action) -> &mut usize {
        match action {
            Action::Keep => &mut self.keep,
            Action::Close => &mut self.close,
            Action::Bookmark => &mut self.bookmark,
        }
    }
}

/// 汇总统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_action: ActionCounts,
    /// 多出来的重复副本数：各组 (大小 - 1) 之和
    pub duplicate_count: usize,
}

/// 按分类首次出现顺序排列的分类桶
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBuckets {
    buckets: Vec<(String, Vec<TabRecord>)>,
    index: HashMap<String, usize>,
}

impl CategoryBuckets {
    /// 取分类桶，不存在时追加到末尾
    pub fn bucket_mut(&mut self, key: &str) -> &mut Vec<TabRecord> {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.index.insert(key.to_string(), self.buckets.len());
                self.buckets.push((key.to_string(), Vec::new()));
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[pos].1
    }

    pub fn get(&self, key: &str) -> Option<&Vec<TabRecord>> {
        self.index.get(key).map(|&pos| &self.buckets[pos].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Vec<TabRecord>> {
        self.index.get(key).map(|&pos| &mut self.buckets[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<TabRecord>)> {
        self.buckets.iter().map(|(key, records)| (key, records))
    }

    pub fn values(&self) -> impl Iterator<Item = &Vec<TabRecord>> {
        self.buckets.iter().map(|(_, records)| records)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Serialize for CategoryBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for CategoryBuckets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketsVisitor;

        impl<'de> Visitor<'de> for BucketsVisitor {
            type Value = CategoryBuckets;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("分类键到标签页记录列表的映射")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut buckets = CategoryBuckets::default();
                while let Some((key, records)) = map.next_entry::<String, Vec<TabRecord>>()? {
                    buckets.bucket_mut(&key).extend(records);
                }
                Ok(buckets)
            }
        }

        deserializer.deserialize_map(BucketsVisitor)
    }
}

/// 一次分析的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 分类键 -> 标签页记录（分类按首次出现排序，桶内保持输入顺序）
    pub tabs: CategoryBuckets,
    /// 窗口ID -> 标签页记录（保持输入顺序）
    pub windows: BTreeMap<i64, Vec<TabRecord>>,
    pub stats: AnalysisStats,
    pub duplicates: Vec<DuplicateGroup>,
    #[serde(default)]
    pub all_categories: Vec<CategorySummary>,
    pub timestamp: String,
}

impl AnalysisResult {
    /// 按分类桶顺序遍历全部记录
    pub fn records(&self) -> impl Iterator<Item = &TabRecord> {
        self.tabs.values().flatten()
    }

    pub fn find_record(&self, tab_id: i64) -> Option<&TabRecord> {
        self.records().find(|r| r.id == tab_id)
    }

    /// 按当前记录重新统计处理方式
    pub fn recount_actions(&mut self) {
        let mut counts = ActionCounts::default();
        for record in self.tabs.values().flatten() {
            counts.increment(record.action);
        }
        self.stats.by_action = counts;
    }
}
