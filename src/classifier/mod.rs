//! 分类模块：按层级级联规则为标签页分配分类
pub mod model;
pub mod analyzer;
pub mod classifier;
pub mod global;

// 导出核心接口
pub use self::model::{ClassificationResult, Confidence};
pub use self::analyzer::{ClassifyContext, TierAnalyzer};
pub use self::classifier::{TabClassifier, FALLBACK_REASON};
pub use self::global::{builtin_registry, classify};
