//! 处理计划与执行结果
//! 计划只描述要做什么，真正关闭/收藏由宿主的执行器完成

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advisor::Action;
use crate::analysis::{AnalysisResult, TabRecord};
use crate::error::TgResult;

/// 计划中的单个动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedAction {
    #[serde(rename = "type")]
    pub action: Action,
    pub tab_id: i64,
    pub title: String,
    pub url: String,
    pub reason: String,
    pub category: String,
    pub category_name: String,
    pub close_after_bookmark: bool,
}

/// 参与计划的标签页范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabSelection {
    All,
    Ids(HashSet<i64>),
    /// 快速清理：只取建议关闭或收藏的标签页
    Suggested,
}

impl TabSelection {
    pub fn ids(ids: impl IntoIterator<Item = i64>) -> Self {
        TabSelection::Ids(ids.into_iter().collect())
    }

    pub fn includes(&self, record: &TabRecord) -> bool {
        match self {
            TabSelection::All => true,
            TabSelection::Ids(ids) => ids.contains(&record.id),
            TabSelection::Suggested => record.action != Action::Keep,
        }
    }
}

/// 按分类桶顺序生成处理计划
pub fn build_action_plan(result: &AnalysisResult, selection: &TabSelection) -> Vec<PlannedAction> {
    let plan: Vec<PlannedAction> = result
        .tabs
        .iter()
        .flat_map(|(category, records)| records.iter().map(move |r| (category, r)))
        .filter(|(_, record)| selection.includes(record))
        .map(|(category, record)| PlannedAction {
            action: record.action,
            tab_id: record.id,
            title: record.title.clone(),
            url: record.url.clone(),
            reason: record.reason.clone(),
            category: category.clone(),
            category_name: record.category_name.clone(),
            close_after_bookmark: record.action == Action::Bookmark,
        })
        .collect();
    debug!("生成处理计划，共{}个动作", plan.len());
    plan
}

/// 已处理的标签页
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTab {
    pub tab_id: i64,
    pub title: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedTab {
    pub tab_id: i64,
    pub title: String,
    pub url: String,
    pub reason: String,
    /// 收藏后是否已关闭
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionError {
    pub tab_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub error: String,
}

/// 执行器回报的结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResults {
    #[serde(default)]
    pub closed: Vec<ProcessedTab>,
    #[serde(default)]
    pub bookmarked: Vec<BookmarkedTab>,
    #[serde(default)]
    pub kept: Vec<ProcessedTab>,
    #[serde(default)]
    pub errors: Vec<ExecutionError>,
}

impl ExecutionResults {
    /// 成功处理的标签页数（不含错误）
    pub fn processed(&self) -> usize {
        self.closed.len() + self.bookmarked.len() + self.kept.len()
    }
}

/// 宿主侧执行器
pub trait ActionExecutor {
    fn close_tab(&mut self, tab_id: i64) -> TgResult<()>;

    fn bookmark_tab(&mut self, action: &PlannedAction) -> TgResult<()>;
}

/// 逐个执行计划；单个动作失败记入 errors，不中断后续动作
pub fn execute_plan<E: ActionExecutor + ?Sized>(executor: &mut E, plan: &[PlannedAction]) -> ExecutionResults {
    let mut results = ExecutionResults::default();

    for action in plan {
        let processed = || ProcessedTab {
            tab_id: action.tab_id,
            title: action.title.clone(),
            url: action.url.clone(),
            reason: action.reason.clone(),
        };

        let outcome = match action.action {
            Action::Close => executor.close_tab(action.tab_id).map(|_| results.closed.push(processed())),
            Action::Bookmark => executor
                .bookmark_tab(action)
                .and_then(|_| {
                    if action.close_after_bookmark {
                        executor.close_tab(action.tab_id)?;
                    }
                    Ok(())
                })
                .map(|_| {
                    results.bookmarked.push(BookmarkedTab {
                        tab_id: action.tab_id,
                        title: action.title.clone(),
                        url: action.url.clone(),
                        reason: action.reason.clone(),
                        closed: action.close_after_bookmark,
                    })
                }),
            Action::Keep => {
                results.kept.push(processed());
                Ok(())
            }
        };

        if let Err(e) = outcome {
            warn!("标签页 {} 执行 {} 失败：{}", action.tab_id, action.action, e);
            results.errors.push(ExecutionError {
                tab_id: action.tab_id,
                title: Some(action.title.clone()),
                error: e.to_string(),
            });
        }
    }

    debug!(
        "执行完成：关闭{}，收藏{}，保留{}，失败{}",
        results.closed.len(),
        results.bookmarked.len(),
        results.kept.len(),
        results.errors.len()
    );
    results
}

/// 只记录调用、不触碰浏览器的执行器
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    pub closed: Vec<i64>,
    pub bookmarked: Vec<i64>,
}

impl ActionExecutor for DryRunExecutor {
    fn close_tab(&mut self, tab_id: i64) -> TgResult<()> {
        self.closed.push(tab_id);
        Ok(())
    }

    fn bookmark_tab(&mut self, action: &PlannedAction) -> TgResult<()> {
        self.bookmarked.push(action.tab_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_with_settings, Tab};
    use std::io;
    use crate::rule::keys;
    use crate::config::Settings;
    use chrono::{TimeZone, Utc};

    fn sample_result() -> AnalysisResult {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let stale = (now.timestamp_millis() - 10 * 3_600_000) as f64;
        let mut social = Tab::new(2, 1, "https://reddit.com/", "Reddit");
        social.last_accessed = Some(stale);
        let mut docs = Tab::new(3, 1, "https://devdocs.io/rust/", "DevDocs");
        docs.last_accessed = Some(stale);
        let tabs = vec![Tab::new(1, 1, "https://example.com/", "Example"), social, docs];
        analyze_with_settings(&tabs, &Settings::default(), now)
    }

    #[test]
    fn test_plan_follows_category_order() {
        let result = sample_result();
        let plan = build_action_plan(&result, &TabSelection::All);
        let categories: Vec<&str> = plan.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(categories, vec![keys::OTHER, keys::SOCIAL, keys::DOCUMENTATION]);

        let docs = &plan[2];
        assert_eq!(docs.action, Action::Bookmark);
        assert!(docs.close_after_bookmark);
        assert!(!plan[1].close_after_bookmark);

        let json = serde_json::to_value(&plan[1]).unwrap();
        assert_eq!(json["type"], "close");
        assert_eq!(json["tabId"], 2);
        assert_eq!(json["categoryName"], "Social Media");
    }

    #[test]
    fn test_plan_selection() {
        let result = sample_result();
        let plan = build_action_plan(&result, &TabSelection::ids([2, 99]));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].tab_id, 2);
    }

    #[test]
    fn test_suggested_selection_skips_keep() {
        let result = sample_result();
        let plan = build_action_plan(&result, &TabSelection::Suggested);
        let picked: Vec<(i64, Action)> = plan.iter().map(|a| (a.tab_id, a.action)).collect();
        assert_eq!(picked, vec![(2, Action::Close), (3, Action::Bookmark)]);
        assert!(plan[1].close_after_bookmark);
    }

    #[test]
    fn test_dry_run_execution() {
        let plan = build_action_plan(&sample_result(), &TabSelection::All);
        let mut executor = DryRunExecutor::default();
        let results = execute_plan(&mut executor, &plan);

        assert_eq!(results.closed.len(), 1);
        assert_eq!(results.bookmarked.len(), 1);
        assert!(results.bookmarked[0].closed);
        assert_eq!(results.kept.len(), 1);
        assert_eq!(results.processed(), 3);
        assert_eq!(executor.closed, vec![2, 3]);
        assert_eq!(executor.bookmarked, vec![3]);
    }

    struct FailingExecutor;

    impl ActionExecutor for FailingExecutor {
        fn close_tab(&mut self, tab_id: i64) -> TgResult<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, format!("tab {} gone", tab_id)).into())
        }

        fn bookmark_tab(&mut self, _action: &PlannedAction) -> TgResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failures_recorded_and_continue() {
        let plan = build_action_plan(&sample_result(), &TabSelection::All);
        let results = execute_plan(&mut FailingExecutor, &plan);
        assert_eq!(results.errors.len(), 2);
        assert_eq!(results.kept.len(), 1);
        assert!(results.closed.is_empty());
        assert!(results.bookmarked.is_empty());
        assert_eq!(results.errors[0].title.as_deref(), Some("Reddit"));
    }
}
