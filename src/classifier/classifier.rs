//! 分类器核心：按固定顺序执行各层级分析器，首个命中即返回
use tracing::debug;

use super::analyzer::{
    ClassifyContext, DomainAnalyzer, KeywordAnalyzer, PathAnalyzer, QueryParamAnalyzer, SubdomainAnalyzer,
    TierAnalyzer, TitleAnalyzer,
};
use super::model::{ClassificationResult, Confidence};
use crate::analysis::Tab;
use crate::rule::{keys, CategoryRegistry, RuleTables, NEUTRAL_COLOR};
use crate::utils::TabUrl;

type TierFn = fn(&ClassifyContext) -> Option<ClassificationResult>;

/// 分类层级，按评估顺序排列
const CASCADE: [(&str, TierFn); 6] = [
    (SubdomainAnalyzer::TIER_NAME, SubdomainAnalyzer::analyze),
    (PathAnalyzer::TIER_NAME, PathAnalyzer::analyze),
    (QueryParamAnalyzer::TIER_NAME, QueryParamAnalyzer::analyze),
    (TitleAnalyzer::TIER_NAME, TitleAnalyzer::analyze),
    (DomainAnalyzer::TIER_NAME, DomainAnalyzer::analyze),
    (KeywordAnalyzer::TIER_NAME, KeywordAnalyzer::analyze),
];

pub const FALLBACK_REASON: &str = "No clear category match";

/// 标签页分类器
#[derive(Debug, Clone, Copy)]
pub struct TabClassifier<'a> {
    tables: &'a RuleTables,
    registry: &'a CategoryRegistry,
}

impl<'a> TabClassifier<'a> {
    pub fn new(tables: &'a RuleTables, registry: &'a CategoryRegistry) -> Self {
        Self { tables, registry }
    }

    pub fn registry(&self) -> &'a CategoryRegistry {
        self.registry
    }

    /// 对单个标签页分类，总会返回一个结果
    pub fn classify(&self, tab: &Tab) -> ClassificationResult {
        let url = TabUrl::parse(&tab.url);
        self.classify_parsed(tab, &url)
    }

    /// 复用已解析的URL
    pub fn classify_parsed(&self, tab: &Tab, url: &TabUrl) -> ClassificationResult {
        let title = tab.title.to_lowercase();
        let ctx = ClassifyContext {
            url,
            title: &title,
            tables: self.tables,
            registry: self.registry,
        };

        for (tier_name, tier) in CASCADE.iter() {
            if let Some(result) = tier(&ctx) {
                return result;
            }
            debug!("标签页 {} 未命中 [{}] 层", tab.id, tier_name);
        }

        self.fallback()
    }

    /// 兜底结果：OTHER 分类缺失时使用安全默认值
    fn fallback(&self) -> ClassificationResult {
        match self.registry.fallback() {
            Some(other) => ClassificationResult::from_category(other, Confidence::Low, FALLBACK_REASON.to_string()),
            None => ClassificationResult {
                category: keys::OTHER.to_string(),
                category_name: "Other".to_string(),
                color: NEUTRAL_COLOR.to_string(),
                confidence: Confidence::Low,
                reason: FALLBACK_REASON.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{merge_categories, CustomCategoryDescriptor, BUILTIN_TABLES};
    use serde_json::json;

    fn tab(url: &str, title: &str) -> Tab {
        Tab::new(1, 1, url, title)
    }

    fn builtin_registry() -> CategoryRegistry {
        CategoryRegistry::from_builtin(&BUILTIN_TABLES.builtin_categories)
    }

    fn classify(url: &str, title: &str) -> ClassificationResult {
        let registry = builtin_registry();
        TabClassifier::new(&BUILTIN_TABLES, &registry).classify(&tab(url, title))
    }

    #[test]
    fn test_subdomain_beats_path() {
        let result = classify("https://mail.google.com/mail/u/0/#inbox", "Inbox");
        assert_eq!(result.category, keys::EMAIL);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.reason, "Subdomain matches Email");

        // 子域名规则优先于其他分类的路径模式
        let result = classify("https://docs.google.com/document/d/abc/edit", "Plan");
        assert_eq!(result.category, keys::WORK);
    }

    #[test]
    fn test_strict_subdomain_match() {
        assert_eq!(classify("https://someone.github.io/project", "").category, keys::DOCUMENTATION);
        // 仅以模式结尾但不是子域名，不走子域名层
        let result = classify("https://notgithub.io/", "");
        assert_ne!(result.reason, "Subdomain matches Documentation & Learning");
    }

    #[test]
    fn test_path_pattern_with_and_without_trailing_slash() {
        for url in ["https://example.com/docs", "https://example.com/docs/"] {
            let result = classify(url, "");
            assert_eq!(result.category, keys::DOCUMENTATION);
            assert_eq!(result.reason, "Path matches Documentation & Learning (/docs)");
        }

        let result = classify("https://example.com/v1/api/users", "");
        assert_eq!(result.reason, "Path matches Documentation & Learning (/api/)");

        let result = classify("https://github.com/org/repo/docs/guide", "Guide - Documentation");
        assert_eq!(result.category, keys::DOCUMENTATION);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.reason, "Path matches Documentation & Learning (/docs)");
    }

    #[test]
    fn test_search_query_param() {
        let result = classify("https://duckduckgo.com/?q=rust+lifetimes", "");
        assert_eq!(result.category, keys::SEARCH);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.reason, "Search query param (q=)");

        // 空值不算
        let result = classify("https://example.com/?s=", "");
        assert_eq!(result.category, keys::OTHER);
    }

    #[test]
    fn test_title_suffix() {
        let result = classify("https://example.com/", "Widgets - Amazon");
        assert_eq!(result.category, keys::SHOPPING);
        assert_eq!(result.reason, "Title suffix:  - amazon");
    }

    #[test]
    fn test_earlier_tier_wins_when_tiers_disagree() {
        // 标题(SOCIAL)先于域名(ENTERTAINMENT)
        let result = classify("https://www.youtube.com/", "Cats - YouTube");
        assert_eq!(result.category, keys::SOCIAL);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.reason, "Title suffix:  - youtube");

        // 查询参数(SEARCH)先于标题(SHOPPING)
        let result = classify("https://example.com/?q=x", "Widgets - Amazon");
        assert_eq!(result.category, keys::SEARCH);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.reason, "Search query param (q=)");

        // 路径(SHOPPING)先于查询参数(SEARCH)
        let result = classify("https://shop.example/cart?q=x", "");
        assert_eq!(result.category, keys::SHOPPING);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.reason, "Path matches Shopping (/cart)");
    }

    #[test]
    fn test_empty_host_skips_domain_tier() {
        let result = classify("file:///home/user/notes.txt", "");
        assert_eq!(result.category, keys::OTHER);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.reason, FALLBACK_REASON);
    }

    #[test]
    fn test_domain_match_bidirectional() {
        let result = classify("https://www.reddit.com/", "");
        assert_eq!(result.category, keys::SOCIAL);
        assert_eq!(result.reason, "Domain matches Social Media");

        // 已知的宽松匹配：x.com 是 netflix.com 的子串
        let result = classify("https://netflix.com/", "");
        assert_eq!(result.category, keys::SOCIAL);
    }

    #[test]
    fn test_keyword_match_lists_all_hits() {
        let result = classify("https://example.com/", "Project sprint board");
        assert_eq!(result.category, keys::WORK);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.reason, "Keywords: project, sprint, board");
    }

    #[test]
    fn test_fallback() {
        let result = classify("https://example.com/", "");
        assert_eq!(result.category, keys::OTHER);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.reason, FALLBACK_REASON);

        let empty = CategoryRegistry::new();
        let result = TabClassifier::new(&BUILTIN_TABLES, &empty).classify(&tab("https://example.com/", ""));
        assert_eq!(result.category, keys::OTHER);
        assert_eq!(result.category_name, "Other");
        assert_eq!(result.color, NEUTRAL_COLOR);
    }

    #[test]
    fn test_malformed_url_still_uses_title() {
        let result = classify("not a url", "Rust Guide - Documentation");
        assert_eq!(result.category, keys::DOCUMENTATION);
        assert_eq!(result.confidence, Confidence::Medium);

        let result = classify("::::", "");
        assert_eq!(result.category, keys::OTHER);
    }

    #[test]
    fn test_custom_category_participates() {
        let custom: Vec<CustomCategoryDescriptor> = vec![serde_json::from_value(json!({
            "id": "GAMING",
            "name": "Gaming",
            "domains": ["steampowered.com"],
            "keywords": ["speedrun"]
        }))
        .unwrap()];
        let registry = merge_categories(&BUILTIN_TABLES.builtin_categories, &custom);
        let classifier = TabClassifier::new(&BUILTIN_TABLES, &registry);

        let result = classifier.classify(&tab("https://store.steampowered.com/app/1", ""));
        assert_eq!(result.category, "GAMING");
        assert_eq!(result.category_name, "Gaming");

        let result = classifier.classify(&tab("https://example.com/", "Any% speedrun"));
        assert_eq!(result.category, "GAMING");
        assert_eq!(result.reason, "Keywords: speedrun");
    }

    #[test]
    fn test_deterministic() {
        let registry = builtin_registry();
        let classifier = TabClassifier::new(&BUILTIN_TABLES, &registry);
        let t = tab("https://news.ycombinator.com/item?id=1", "Hacker News");
        assert_eq!(classifier.classify(&t), classifier.classify(&t));
    }
}
