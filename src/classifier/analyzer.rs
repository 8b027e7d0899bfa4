//! 分类层级分析器：每一层负责一类规则，命中即返回
use tracing::debug;

use super::model::{ClassificationResult, Confidence};
use crate::rule::{keys, Category, CategoryRegistry, RuleTables};
use crate::utils::TabUrl;

/// 单个标签页的分类上下文（一次构建，各层共享）
pub struct ClassifyContext<'a> {
    pub url: &'a TabUrl,
    /// 小写标题
    pub title: &'a str,
    pub tables: &'a RuleTables,
    pub registry: &'a CategoryRegistry,
}

/// 所有分类层级的通用抽象
pub trait TierAnalyzer {
    /// 层级名称，用于日志输出
    const TIER_NAME: &'static str;

    /// 尝试匹配，未命中返回 None
    fn analyze(ctx: &ClassifyContext) -> Option<ClassificationResult>;
}

/// 命中处理：标准日志输出 + 构建结果
fn handle_match_success(
    tier: &str,
    category: &Category,
    confidence: Confidence,
    reason: String,
) -> ClassificationResult {
    debug!("[{}]匹配成功 | 分类: {} | 置信度: {} | 原因: {}", tier, category.key, confidence, reason);
    ClassificationResult::from_category(category, confidence, reason)
}

/// 第1层：子域名规则
pub struct SubdomainAnalyzer;

impl TierAnalyzer for SubdomainAnalyzer {
    const TIER_NAME: &'static str = "Subdomain";

    fn analyze(ctx: &ClassifyContext) -> Option<ClassificationResult> {
        let host = ctx.url.host.as_str();
        if host.is_empty() {
            return None;
        }

        for (pattern, key) in &ctx.tables.subdomain_rules {
            let is_subdomain = host
                .strip_suffix(pattern.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'));
            if host != pattern && !is_subdomain {
                continue;
            }
            // 分类被移除时继续尝试后续规则
            let Some(category) = ctx.registry.get(key) else {
                continue;
            };
            let reason = format!("Subdomain matches {}", category.name);
            return Some(handle_match_success(Self::TIER_NAME, category, Confidence::High, reason));
        }
        None
    }
}

/// 第2层：路径模式
pub struct PathAnalyzer;

impl TierAnalyzer for PathAnalyzer {
    const TIER_NAME: &'static str = "Path";

    fn analyze(ctx: &ClassifyContext) -> Option<ClassificationResult> {
        if !ctx.url.is_parsed() {
            return None;
        }

        for (key, patterns) in &ctx.tables.path_patterns {
            let Some(category) = ctx.registry.get(key) else {
                continue;
            };
            let matched = patterns.iter().find(|p| {
                ctx.url.path.contains(p.as_str())
                    || ctx.url.path_with_slash.contains(&format!("{}/", p))
            });
            if let Some(pattern) = matched {
                let reason = format!("Path matches {} ({})", category.name, pattern);
                return Some(handle_match_success(Self::TIER_NAME, category, Confidence::High, reason));
            }
        }
        None
    }
}

/// 第3层：搜索查询参数
pub struct QueryParamAnalyzer;

impl TierAnalyzer for QueryParamAnalyzer {
    const TIER_NAME: &'static str = "QueryParam";

    fn analyze(ctx: &ClassifyContext) -> Option<ClassificationResult> {
        let category = ctx.registry.get(keys::SEARCH)?;

        for param in &ctx.tables.search_query_params {
            let has_value = ctx
                .url
                .first_query_value(param)
                .is_some_and(|value| !value.is_empty());
            if has_value {
                let reason = format!("Search query param ({}=)", param);
                return Some(handle_match_success(Self::TIER_NAME, category, Confidence::Medium, reason));
            }
        }
        None
    }
}

/// 第4层：标题后缀/短语
pub struct TitleAnalyzer;

impl TierAnalyzer for TitleAnalyzer {
    const TIER_NAME: &'static str = "Title";

    fn analyze(ctx: &ClassifyContext) -> Option<ClassificationResult> {
        if ctx.title.is_empty() {
            return None;
        }

        for (key, suffixes) in &ctx.tables.title_suffixes {
            let Some(category) = ctx.registry.get(key) else {
                continue;
            };
            if let Some(suffix) = suffixes.iter().find(|s| ctx.title.contains(s.as_str())) {
                let reason = format!("Title suffix: {}", suffix);
                return Some(handle_match_success(Self::TIER_NAME, category, Confidence::Medium, reason));
            }
        }
        None
    }
}

/// 第5层：域名列表（注册表顺序，自定义分类参与）
/// 双向子串匹配较宽松，互为子串的无关域名也会命中
pub struct DomainAnalyzer;

impl TierAnalyzer for DomainAnalyzer {
    const TIER_NAME: &'static str = "Domain";

    fn analyze(ctx: &ClassifyContext) -> Option<ClassificationResult> {
        let host = ctx.url.host.as_str();
        // 空主机名是任何域名的子串，不参与匹配
        if host.is_empty() {
            return None;
        }

        for category in ctx.registry.iter() {
            if category.key == keys::OTHER {
                continue;
            }
            let matched = category
                .domains
                .iter()
                .any(|d| host.contains(d.as_str()) || d.contains(host));
            if matched {
                let reason = format!("Domain matches {}", category.name);
                return Some(handle_match_success(Self::TIER_NAME, category, Confidence::High, reason));
            }
        }
        None
    }
}

/// 第6层：关键词（标题或完整URL中出现）
pub struct KeywordAnalyzer;

impl TierAnalyzer for KeywordAnalyzer {
    const TIER_NAME: &'static str = "Keyword";

    fn analyze(ctx: &ClassifyContext) -> Option<ClassificationResult> {
        for category in ctx.registry.iter() {
            if category.key == keys::OTHER {
                continue;
            }
            let matches: Vec<&str> = category
                .keywords
                .iter()
                .map(String::as_str)
                .filter(|kw| ctx.title.contains(kw) || ctx.url.lower.contains(kw))
                .collect();
            if !matches.is_empty() {
                let reason = format!("Keywords: {}", matches.join(", "));
                return Some(handle_match_success(Self::TIER_NAME, category, Confidence::Medium, reason));
            }
        }
        None
    }
}
