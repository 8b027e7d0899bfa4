//! 全局默认注册表单例
//! 仅含内置分类，供无需自定义分类的调用方直接使用
use once_cell::sync::Lazy;

use super::classifier::TabClassifier;
use super::model::ClassificationResult;
use crate::analysis::Tab;
use crate::rule::{CategoryRegistry, BUILTIN_TABLES};

/// 全局内置注册表实例（只读，首次访问时构建）
static BUILTIN_REGISTRY: Lazy<CategoryRegistry> =
    Lazy::new(|| CategoryRegistry::from_builtin(&BUILTIN_TABLES.builtin_categories));

/// 获取全局内置注册表
pub fn builtin_registry() -> &'static CategoryRegistry {
    &BUILTIN_REGISTRY
}

/// 使用内置规则表对标签页分类
pub fn classify(tab: &Tab, registry: &CategoryRegistry) -> ClassificationResult {
    TabClassifier::new(&BUILTIN_TABLES, registry).classify(tab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::keys;

    #[test]
    fn test_builtin_registry_covers_every_result() {
        let registry = builtin_registry();
        for (url, title) in [
            ("https://www.amazon.com/cart", "Cart"),
            ("https://example.com/", ""),
            ("chrome-weird", "x"),
        ] {
            let result = classify(&Tab::new(1, 1, url, title), registry);
            assert!(registry.contains(&result.category), "missing key {}", result.category);
        }
        assert!(registry.contains(keys::OTHER));
    }
}
