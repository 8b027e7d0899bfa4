//! rstabgenius - 浏览器标签页智能分类与整理引擎

// 导出全局错误类型
pub use self::error::{TabGeniusError, TgResult};

// 导出配置模块
pub use self::config::{
    BookmarkFolderParent, BookmarkSaveLocation, CategoryAction, RawSettings, Settings, SettingsBuilder,
};

// 导出规则模块核心接口
pub use self::rule::{
    group_color_for, keys, merge_categories, Category, CategoryRegistry, CategorySummary,
    CustomCategoryDescriptor, RuleTables, BUILTIN_TABLES,
};

// 导出工具模块核心接口
pub use self::utils::{badge_text, TabUrl, UrlNormalizer};

// 导出分类模块核心接口
pub use self::classifier::{builtin_registry, classify, ClassificationResult, Confidence, TabClassifier};

// 导出建议模块核心接口
pub use self::advisor::{Action, ActionAdvisor, ActionSuggestion};

// 导出分析模块核心接口
pub use self::analysis::{
    analyze, analyze_with_settings, duplicate_tab_ids_to_close, AnalysisResult, AnalysisStats, CategoryBuckets,
    DuplicateDetector, DuplicateGroup, Tab, TabAnalyzer, TabRecord,
};

// 导出后处理模块核心接口
pub use self::postprocess::{
    apply_decisions, build_action_plan, execute_plan, render_report, report_file_name, ActionExecutor,
    CategoryDecision, Decisions, DecisionKind, DryRunExecutor, ExecutionResults, PlannedAction, TabSelection,
};

// 导出会话与加载接口
pub use self::session::{Session, SessionStore, SessionTab};
pub use self::loader::SnapshotLoader;

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod utils;
pub mod classifier;
pub mod advisor;
pub mod analysis;
pub mod postprocess;
pub mod session;
pub mod loader;
