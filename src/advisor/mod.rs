//! 建议模块：为已分类的标签页给出处理建议
pub mod model;
pub mod action_advisor;

pub use self::model::{Action, ActionSuggestion};
pub use self::action_advisor::ActionAdvisor;
