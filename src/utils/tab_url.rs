//! 标签页URL拆解
//! 一次解析，供各级分类规则复用主机名/路径/查询参数

use url::Url;

/// 解析后的标签页URL视图
/// 解析失败时 `parsed` 为空，仅保留小写原始串供关键词匹配
#[derive(Debug, Clone)]
pub struct TabUrl {
    parsed: Option<Url>,
    /// 去掉开头 `www.` 的主机名
    pub host: String,
    /// 小写路径
    pub path: String,
    /// 保证以 `/` 结尾的小写路径
    pub path_with_slash: String,
    /// 小写完整URL
    pub lower: String,
}

impl TabUrl {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let Ok(url) = Url::parse(raw) else {
            return Self {
                parsed: None,
                host: String::new(),
                path: String::new(),
                path_with_slash: String::new(),
                lower,
            };
        };

        let host = url.host_str().unwrap_or("");
        let host = host.strip_prefix("www.").unwrap_or(host).to_string();
        let path = url.path().to_lowercase();
        let path_with_slash = if path.ends_with('/') {
            path.clone()
        } else {
            format!("{}/", path)
        };

        Self {
            parsed: Some(url),
            host,
            path,
            path_with_slash,
            lower,
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    /// 查询参数的首个取值（参数不存在返回 None）
    pub fn first_query_value(&self, name: &str) -> Option<String> {
        let url = self.parsed.as_ref()?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}
