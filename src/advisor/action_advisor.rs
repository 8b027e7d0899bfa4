//! 处理建议器
//! 按固定优先级阶梯为标签页给出 keep/close/bookmark 建议：
//! 硬保护（购物车、近期工作）> 分类配置 > 分类专属过期阈值 > 通用过期

use tracing::debug;

use super::model::{Action, ActionSuggestion};
use crate::analysis::Tab;
use crate::classifier::ClassificationResult;
use crate::config::{CategoryAction, Settings};
use crate::rule::keys;

const MS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;

const WORK_PROTECT_HOURS: f64 = 4.0;
const DOCS_BOOKMARK_HOURS: f64 = 2.0;
const SEARCH_STALE_HOURS: f64 = 1.0;
const SOCIAL_STALE_HOURS: f64 = 3.0;

/// 处理建议器
pub struct ActionAdvisor;

impl ActionAdvisor {
    /// 标签页闲置时长（小时）；无访问时间或非正值视为刚访问
    pub fn age_hours(tab: &Tab, now_ms: f64) -> f64 {
        tab.last_accessed
            .filter(|&accessed| accessed > 0.0)
            .map(|accessed| (now_ms - accessed) / MS_PER_HOUR)
            .unwrap_or(0.0)
    }

    /// 给出处理建议（纯函数，当前时间由调用方传入）
    pub fn suggest(
        tab: &Tab,
        classification: &ClassificationResult,
        settings: &Settings,
        now_ms: f64,
    ) -> ActionSuggestion {
        let age = Self::age_hours(tab, now_ms);
        let category = classification.category.as_str();
        let suggestion = Self::decide(tab, category, age, settings);
        debug!(
            "标签页 {} 建议：{} | 分类: {} | 闲置: {:.2}h | 原因: {}",
            tab.id, suggestion.action, category, age, suggestion.reason
        );
        suggestion
    }

    fn decide(tab: &Tab, category: &str, age: f64, settings: &Settings) -> ActionSuggestion {
        // 1. 进行中的购物流程
        if category == keys::SHOPPING && (tab.url.contains("cart") || tab.url.contains("checkout")) {
            return ActionSuggestion::new(Action::Keep, "Shopping cart active", 0);
        }

        // 2. 近期使用过的工作标签页
        if category == keys::WORK && age < WORK_PROTECT_HOURS {
            return ActionSuggestion::new(Action::Keep, "Recently active work tab", 0);
        }

        let category_action = settings.category_action(category);

        // 3. 分类配置为保留
        if category_action == CategoryAction::Keep {
            return ActionSuggestion::new(Action::Keep, "Category set to keep", 0);
        }

        // 4. 文档类超过2小时收藏，除非明确配置为关闭
        if category == keys::DOCUMENTATION
            && settings.auto_bookmark_docs
            && age > DOCS_BOOKMARK_HOURS
            && category_action != CategoryAction::Close
        {
            return ActionSuggestion::new(Action::Bookmark, "Useful reference material", 1);
        }

        // 5. 过期搜索页
        if category == keys::SEARCH && age > SEARCH_STALE_HOURS && category_action.allows_close() {
            return ActionSuggestion::new(Action::Close, "Old search tab", 3);
        }

        // 6. 过期社交页
        if category == keys::SOCIAL && age > SOCIAL_STALE_HOURS && category_action.allows_close() {
            return ActionSuggestion::new(Action::Close, "Old social media tab", 2);
        }

        // 7. 通用过期
        if settings.auto_close_old_tabs && age > f64::from(settings.inactive_hours) && category_action.allows_close() {
            let reason = format!("Inactive for {} hours", age.floor() as i64);
            return ActionSuggestion::new(Action::Close, reason, 2);
        }

        ActionSuggestion::default()
    }
}
