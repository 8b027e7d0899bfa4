//! 处理建议数据模型

use std::fmt;
use serde::{Deserialize, Serialize};

/// 标签页处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Keep,
    Close,
    Bookmark,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Keep => "keep",
            Action::Close => "close",
            Action::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 处理建议；priority 仅用于展示排序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSuggestion {
    pub action: Action,
    pub reason: String,
    pub priority: u32,
}

impl ActionSuggestion {
    pub fn new(action: Action, reason: impl Into<String>, priority: u32) -> Self {
        Self {
            action,
            reason: reason.into(),
            priority,
        }
    }
}

impl Default for ActionSuggestion {
    fn default() -> Self {
        Self::new(Action::Keep, "Recently accessed", 0)
    }
}
