//! 内置规则表
//! 内置分类、子域名规则、路径模式、标题后缀与搜索参数，进程内只构建一次

use once_cell::sync::Lazy;

use super::model::Category;

/// 内置分类键
pub mod keys {
    pub const SOCIAL: &str = "SOCIAL";
    pub const WORK: &str = "WORK";
    pub const SHOPPING: &str = "SHOPPING";
    pub const NEWS: &str = "NEWS";
    pub const ENTERTAINMENT: &str = "ENTERTAINMENT";
    pub const DOCUMENTATION: &str = "DOCUMENTATION";
    pub const EMAIL: &str = "EMAIL";
    pub const SEARCH: &str = "SEARCH";
    pub const OTHER: &str = "OTHER";
}

use keys::*;

// (键, 名称, 显示色, 标签组色, 域名, 关键词)
type CategorySeed = (&'static str, &'static str, &'static str, &'static str, &'static [&'static str], &'static [&'static str]);

const CATEGORY_SEEDS: &[CategorySeed] = &[
    (
        SOCIAL, "Social Media", "#3b82f6", "blue",
        &["facebook.com", "twitter.com", "x.com", "instagram.com", "linkedin.com", "reddit.com", "tiktok.com",
          "snapchat.com", "pinterest.com", "threads.net", "mastodon.social", "bluesky.social", "discord.com", "discord.gg"],
        &["social", "feed", "post", "profile", "message", "tweet", "timeline"],
    ),
    (
        WORK, "Work & Productivity", "#10b981", "green",
        &["notion.so", "slack.com", "teams.microsoft.com", "asana.com", "trello.com", "monday.com", "jira.atlassian.com",
          "confluence.atlassian.com", "zoom.us", "meet.google.com", "drive.google.com", "docs.google.com",
          "sheets.google.com", "calendar.google.com", "linear.app", "clickup.com", "airtable.com", "figma.com", "miro.com"],
        &["dashboard", "project", "task", "meeting", "workspace", "calendar", "sprint", "board"],
    ),
    (
        SHOPPING, "Shopping", "#f59e0b", "orange",
        &["amazon.com", "ebay.com", "aliexpress.com", "walmart.com", "target.com", "etsy.com", "shopify.com",
          "bestbuy.com", "apple.com", "samsung.com", "newegg.com", "costco.com", "shein.com", "zalando.com"],
        &["cart", "checkout", "product", "shop", "buy", "order", "price", "basket", "wishlist"],
    ),
    (
        NEWS, "News & Media", "#ef4444", "red",
        &["news.ycombinator.com", "cnn.com", "bbc.com", "nytimes.com", "theguardian.com", "reuters.com", "medium.com",
          "substack.com", "apnews.com", "npr.org", "axios.com", "techcrunch.com", "theverge.com", "wired.com"],
        &["article", "news", "breaking", "story", "blog", "headline", "op-ed"],
    ),
    (
        ENTERTAINMENT, "Entertainment", "#ec4899", "pink",
        &["youtube.com", "netflix.com", "twitch.tv", "spotify.com", "soundcloud.com", "hulu.com", "disneyplus.com",
          "primevideo.com", "crunchyroll.com", "vimeo.com", "dailymotion.com", "bandcamp.com", "deezer.com", "apple.com"],
        &["watch", "video", "music", "stream", "play", "episode", "movie", "song", "album", "podcast"],
    ),
    (
        DOCUMENTATION, "Documentation & Learning", "#8b5cf6", "purple",
        &["stackoverflow.com", "github.com", "gitlab.com", "docs.microsoft.com", "developer.mozilla.org", "w3schools.com",
          "coursera.org", "udemy.com", "khanacademy.org", "learn.microsoft.com", "devdocs.io", "documentation.ubuntu.com",
          "doc.rust-lang.org", "reactjs.org", "vuejs.org", "angular.io", "nodejs.org", "npmjs.com", "python.org",
          "rubyonrails.org"],
        &["docs", "documentation", "tutorial", "guide", "api", "reference", "learn", "course", "getting started", "quickstart"],
    ),
    (
        EMAIL, "Email", "#06b6d4", "cyan",
        &["mail.google.com", "outlook.com", "outlook.office.com", "yahoo.com", "protonmail.com", "mail.yahoo.com",
          "gmail.com", "icloud.com", "zoho.com", "fastmail.com", "tutanota.com"],
        &["mail", "inbox", "email", "compose", "message", "sent"],
    ),
    (
        SEARCH, "Search & Research", "#64748b", "grey",
        &["google.com", "bing.com", "duckduckgo.com", "scholar.google.com", "startpage.com", "ecosia.org", "brave.com"],
        &["search", "query", "results", "q="],
    ),
    (OTHER, "Other", "#6b7280", "grey", &[], &[]),
];

// 子域名 -> 分类（精确或严格子域匹配，先于通用域名匹配）
const SUBDOMAIN_RULES: &[(&str, &str)] = &[
    ("mail.google.com", EMAIL),
    ("mail.yahoo.com", EMAIL),
    ("inbox.google.com", EMAIL),
    ("docs.google.com", WORK),
    ("drive.google.com", WORK),
    ("sheets.google.com", WORK),
    ("slides.google.com", WORK),
    ("calendar.google.com", WORK),
    ("meet.google.com", WORK),
    ("scholar.google.com", SEARCH),
    ("play.google.com", ENTERTAINMENT),
    ("music.youtube.com", ENTERTAINMENT),
    ("github.io", DOCUMENTATION),
    ("readthedocs.io", DOCUMENTATION),
    ("gitlab.io", DOCUMENTATION),
    ("notion.site", WORK),
    ("obsidian.md", WORK),
];

// 分类 -> 路径片段
const PATH_PATTERNS: &[(&str, &[&str])] = &[
    (DOCUMENTATION, &["/docs", "/documentation", "/api/", "/reference", "/tutorial", "/guide", "/learn", "/courses", "/wiki/", "/manual"]),
    (NEWS, &["/blog/", "/article", "/news/", "/story", "/archive"]),
    (SHOPPING, &["/product", "/products/", "/item/", "/cart", "/checkout", "/basket", "/order", "/p/", "/dp/"]),
    (SEARCH, &["/search", "/query", "/results", "/find"]),
    (EMAIL, &["/mail", "/inbox", "/compose", "/sent"]),
    (WORK, &["/workspace", "/project", "/dashboard", "/tasks", "/board"]),
    (ENTERTAINMENT, &["/watch", "/video/", "/play", "/episode", "/movie"]),
    (SOCIAL, &["/profile", "/feed", "/timeline", "/post"]),
];

// 分类 -> 标题后缀/短语（均为小写）
const TITLE_SUFFIXES: &[(&str, &[&str])] = &[
    (DOCUMENTATION, &[" - documentation", " | docs", " - api reference", " · github", " - mdn", " - dev docs", " documentation", "tutorial -", "guide -"]),
    (NEWS, &[" - the new york times", " | medium", " - techcrunch", " - bbc news", " article", " - reuters"]),
    (SHOPPING, &[" - amazon", " | ebay", " - walmart", " - target", " shopping", " - etsy"]),
    (SOCIAL, &[" - youtube", " | twitter", " | x.com", " - facebook", " - reddit", " | linkedin"]),
    (WORK, &[" - notion", " | slack", " - asana", " - trello", " | jira"]),
    (ENTERTAINMENT, &[" - netflix", " - spotify", " - twitch", " watch"]),
    (EMAIL, &[" - gmail", " - outlook", " inbox"]),
];

// 表示搜索行为的查询参数
const SEARCH_QUERY_PARAMS: &[&str] = &["q", "query", "search", "s", "p", "keywords", "term"];

/// 引擎内置的固定规则表（与用户自定义无关）
/// 每张表的迭代顺序即评估顺序
#[derive(Debug, Clone)]
pub struct RuleTables {
    pub builtin_categories: Vec<Category>,
    /// (主机名模式, 分类键)
    pub subdomain_rules: Vec<(String, String)>,
    /// (分类键, 路径片段列表)
    pub path_patterns: Vec<(String, Vec<String>)>,
    /// (分类键, 标题片段列表)
    pub title_suffixes: Vec<(String, Vec<String>)>,
    pub search_query_params: Vec<String>,
}

impl RuleTables {
    /// 构建内置规则表
    pub fn builtin() -> Self {
        let builtin_categories = CATEGORY_SEEDS
            .iter()
            .map(|(key, name, color, group_color, domains, keywords)| {
                Category::builtin(key, name, color, group_color, domains, keywords)
            })
            .collect();

        Self {
            builtin_categories,
            subdomain_rules: SUBDOMAIN_RULES
                .iter()
                .map(|(host, key)| (host.to_string(), key.to_string()))
                .collect(),
            path_patterns: to_owned_table(PATH_PATTERNS),
            title_suffixes: to_owned_table(TITLE_SUFFIXES),
            search_query_params: SEARCH_QUERY_PARAMS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_owned_table(table: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
    table
        .iter()
        .map(|(key, items)| {
            (
                key.to_string(),
                items.iter().map(|s| s.to_lowercase()).collect(),
            )
        })
        .collect()
}

/// 全局内置规则表（只读，首次访问时构建）
pub static BUILTIN_TABLES: Lazy<RuleTables> = Lazy::new(RuleTables::builtin);
