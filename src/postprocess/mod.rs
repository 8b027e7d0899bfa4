//! 后处理模块：外部决策覆盖、处理计划与执行报告
pub mod decision;
pub mod plan;
pub mod report;

pub use self::decision::{apply_decisions, parse_decisions, CategoryDecision, DecisionKind, Decisions};
pub use self::plan::{
    build_action_plan, execute_plan, ActionExecutor, BookmarkedTab, DryRunExecutor, ExecutionError,
    ExecutionResults, PlannedAction, ProcessedTab, TabSelection,
};
pub use self::report::{render_report, report_file_name};
