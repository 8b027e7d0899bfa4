//! 规则模块：负责分类数据模型、内置规则表与分类注册表合并
pub mod model;
pub mod builtin;
pub mod registry;

// 导出核心接口
pub use self::model::{Category, CategorySummary, CustomCategoryDescriptor, NEUTRAL_COLOR, NEUTRAL_GROUP_COLOR};
pub use self::builtin::{keys, RuleTables, BUILTIN_TABLES};
pub use self::registry::{group_color_for, merge_categories, CategoryRegistry};
