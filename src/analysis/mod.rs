//! 分析模块：标签页数据模型、重复检测与批量汇总
pub mod model;
pub mod duplicate;
pub mod aggregator;

// 导出核心接口
pub use self::model::{
    ActionCounts, AnalysisResult, CategoryBuckets, AnalysisStats, DuplicateGroup, Tab, TabRecord, TabSummary,
};
pub use self::duplicate::{duplicate_tab_ids_to_close, DuplicateDetector, DuplicateIndex};
pub use self::aggregator::{analyze, analyze_with_settings, TabAnalyzer};
