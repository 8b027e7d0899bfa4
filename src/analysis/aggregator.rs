//! 批量分析器：整合分类器、建议器与重复检测，输出完整分析结果
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::duplicate::DuplicateDetector;
use super::model::{AnalysisResult, AnalysisStats, Tab, TabRecord};
use crate::advisor::ActionAdvisor;
use crate::classifier::TabClassifier;
use crate::config::Settings;
use crate::rule::{merge_categories, CategoryRegistry, RuleTables, BUILTIN_TABLES};
use crate::utils::{TabUrl, UrlNormalizer};

/// 标签页批量分析器
pub struct TabAnalyzer<'a> {
    classifier: TabClassifier<'a>,
    settings: &'a Settings,
}

impl<'a> TabAnalyzer<'a> {
    pub fn new(tables: &'a RuleTables, registry: &'a CategoryRegistry, settings: &'a Settings) -> Self {
        Self {
            classifier: TabClassifier::new(tables, registry),
            settings,
        }
    }

    /// 以当前时间分析
    pub fn analyze(&self, tabs: &[Tab]) -> AnalysisResult {
        self.analyze_at(tabs, Utc::now())
    }

    /// 以指定时间分析（闲置时长与时间戳均基于 `now`）
    pub fn analyze_at(&self, tabs: &[Tab], now: DateTime<Utc>) -> AnalysisResult {
        let now_ms = now.timestamp_millis() as f64;

        // 1. 过滤浏览器内部页面，计算归一化键
        let admitted: Vec<(&Tab, String)> = tabs
            .iter()
            .filter(|tab| !self.settings.is_internal_url(&tab.url))
            .map(|tab| (tab, UrlNormalizer::normalize(&tab.url)))
            .collect();
        debug!("标签页快照共{}个，参与分析{}个", tabs.len(), admitted.len());

        // 2. 重复分组
        let duplicate_index = DuplicateDetector::index(&admitted);

        let mut result = AnalysisResult {
            tabs: Default::default(),
            windows: Default::default(),
            stats: AnalysisStats {
                duplicate_count: duplicate_index.duplicate_count(),
                ..Default::default()
            },
            duplicates: duplicate_index.groups(),
            all_categories: self.classifier.registry().summaries(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        // 3. 逐个分类、给出建议并归桶（保持输入顺序）
        for (tab, normalized) in &admitted {
            let url = TabUrl::parse(&tab.url);
            let classification = self.classifier.classify_parsed(tab, &url);
            let suggestion = ActionAdvisor::suggest(tab, &classification, self.settings, now_ms);
            let record = TabRecord::new(tab, classification, suggestion, duplicate_index.group_size(normalized));

            result.stats.total += 1;
            *result.stats.by_category.entry(record.category.clone()).or_insert(0) += 1;
            result.stats.by_action.increment(record.action);

            result.windows.entry(tab.window_id).or_default().push(record.clone());
            result.tabs.bucket_mut(&record.category).push(record);
        }

        debug!(
            "分析完成：总计{}，分类{}个，重复副本{}，建议关闭{}，建议收藏{}",
            result.stats.total,
            result.tabs.len(),
            result.stats.duplicate_count,
            result.stats.by_action.close,
            result.stats.by_action.bookmark
        );
        result
    }
}

/// 使用内置规则表分析标签页快照
pub fn analyze(tabs: &[Tab], registry: &CategoryRegistry, settings: &Settings) -> AnalysisResult {
    TabAnalyzer::new(&BUILTIN_TABLES, registry, settings).analyze(tabs)
}

/// 按设置中的自定义分类合并注册表后分析
pub fn analyze_with_settings(tabs: &[Tab], settings: &Settings, now: DateTime<Utc>) -> AnalysisResult {
    let registry = merge_categories(&BUILTIN_TABLES.builtin_categories, &settings.custom_categories);
    TabAnalyzer::new(&BUILTIN_TABLES, &registry, settings).analyze_at(tabs, now)
}
