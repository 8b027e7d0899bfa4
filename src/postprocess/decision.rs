//! 外部分类决策覆盖
//! 在核心建议之后按分类整体改写处理方式，不参与分类算法本身

use std::collections::{BTreeMap, HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advisor::Action;
use crate::analysis::AnalysisResult;

/// 分类级别的批量决策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// 关闭除 `keep` 列表外的全部标签页
    CloseMost,
    KeepAll,
    BookmarkUseful,
    // 兼容：未知决策忽略
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDecision {
    pub action: DecisionKind,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub keep: Vec<i64>,
}

/// 分类键 -> 决策
pub type Decisions = BTreeMap<String, CategoryDecision>;

/// 应用外部决策，返回被改写的记录数
/// 分类桶与窗口桶同步改写，处理方式统计重新计算
pub fn apply_decisions(result: &mut AnalysisResult, decisions: &Decisions) -> usize {
    let mut updates: HashMap<i64, (Action, String)> = HashMap::new();

    for (category, decision) in decisions {
        let Some(records) = result.tabs.get_mut(category) else {
            debug!("决策中的分类 {} 不在分析结果中，已忽略", category);
            continue;
        };
        if decision.action == DecisionKind::Unknown {
            warn!("分类 {} 的决策类型无法识别，已忽略", category);
            continue;
        }

        let exempt: HashSet<i64> = decision.keep.iter().copied().collect();
        for record in records.iter_mut() {
            let action = match decision.action {
                DecisionKind::CloseMost if !exempt.contains(&record.id) => Action::Close,
                DecisionKind::CloseMost => continue,
                DecisionKind::KeepAll => Action::Keep,
                DecisionKind::BookmarkUseful => Action::Bookmark,
                DecisionKind::Unknown => continue,
            };
            record.action = action;
            record.reason = decision.reason.clone();
            updates.insert(record.id, (action, decision.reason.clone()));
        }
    }

    for record in result.windows.values_mut().flatten() {
        if let Some((action, reason)) = updates.get(&record.id) {
            record.action = *action;
            record.reason = reason.clone();
        }
    }

    result.recount_actions();
    debug!("外部决策覆盖完成，改写{}条记录", updates.len());
    updates.len()
}

/// 从JSON解析决策
pub fn parse_decisions(json: &str) -> crate::TgResult<Decisions> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_with_settings, Tab};
    use crate::config::Settings;
    use crate::rule::keys;
    use chrono::{TimeZone, Utc};

    fn sample() -> AnalysisResult {
        let tabs = vec![
            Tab::new(1, 1, "https://reddit.com/", "a"),
            Tab::new(2, 2, "https://x.com/", "b"),
            Tab::new(3, 2, "https://facebook.com/", "c"),
            Tab::new(4, 1, "https://doc.rust-lang.org/std/", "d"),
        ];
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        analyze_with_settings(&tabs, &Settings::default(), now)
    }

    #[test]
    fn test_close_most_respects_keep_list() {
        let mut result = sample();
        let decisions = parse_decisions(
            r#"{
                "SOCIAL": { "action": "close_most", "reason": "Too many feeds", "keep": [2] },
                "DOCUMENTATION": { "action": "bookmark_useful", "reason": "Reference" },
                "NEWS": { "action": "keep_all", "reason": "nothing here" }
            }"#,
        )
        .unwrap();

        let changed = apply_decisions(&mut result, &decisions);
        assert_eq!(changed, 3);

        let social = result.tabs.get(keys::SOCIAL).unwrap();
        let actions: Vec<(i64, Action)> = social.iter().map(|r| (r.id, r.action)).collect();
        assert_eq!(actions, vec![(1, Action::Close), (2, Action::Keep), (3, Action::Close)]);
        assert_eq!(social[0].reason, "Too many feeds");
        assert_eq!(social[1].reason, "Recently accessed");

        // 窗口桶同步
        let window2: Vec<Action> = result.windows[&2].iter().map(|r| r.action).collect();
        assert_eq!(window2, vec![Action::Keep, Action::Close]);

        assert_eq!(result.stats.by_action.close, 2);
        assert_eq!(result.stats.by_action.bookmark, 1);
        assert_eq!(result.stats.by_action.keep, 1);
    }

    #[test]
    fn test_unknown_decision_ignored() {
        let mut result = sample();
        let decisions = parse_decisions(r#"{ "SOCIAL": { "action": "archive", "reason": "?" } }"#).unwrap();
        assert_eq!(apply_decisions(&mut result, &decisions), 0);
        assert_eq!(result.stats.by_action.keep, 4);
    }
}
