//! URL归一化工具
//! 生成去重比较用的规范URL：查询参数按键稳定排序、去掉片段标识

use tracing::warn;
use url::Url;

/// URL归一化工具
pub struct UrlNormalizer;

impl UrlNormalizer {
    /// 归一化URL；解析失败时原样返回（视为唯一URL，不丢弃）
    pub fn normalize(raw: &str) -> String {
        let mut url = match Url::parse(raw) {
            Ok(url) => url,
            Err(e) => {
                warn!("URL解析失败，按原样参与去重：{}，错误：{}", raw, e);
                return raw.to_string();
            }
        };

        if url.query().is_some() {
            let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
            if pairs.is_empty() {
                url.set_query(None);
            } else {
                // sort_by 为稳定排序，同名参数保持原相对顺序
                pairs.sort_by(|a, b| a.0.cmp(&b.0));
                url.query_pairs_mut().clear().extend_pairs(pairs);
            }
        }
        url.set_fragment(None);

        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_order_and_fragment_ignored() {
        assert_eq!(
            UrlNormalizer::normalize("https://x.com/a?b=2&a=1"),
            UrlNormalizer::normalize("https://x.com/a?a=1&b=2#frag")
        );
        assert_eq!(UrlNormalizer::normalize("https://x.com/a?b=2&a=1"), "https://x.com/a?a=1&b=2");
    }

    #[test]
    fn test_repeated_keys_keep_relative_order() {
        assert_eq!(
            UrlNormalizer::normalize("https://x.com/?t=2&a=0&t=1"),
            "https://x.com/?a=0&t=2&t=1"
        );
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "https://x.com/a?b=2&a=1#top",
            "https://Example.COM/Path?z=%20y&a=b+c",
            "https://x.com/a?",
            "http://localhost:8080/",
        ] {
            let once = UrlNormalizer::normalize(raw);
            assert_eq!(UrlNormalizer::normalize(&once), once, "input: {}", raw);
        }
    }

    #[test]
    fn test_distinct_parts_stay_distinct() {
        let base = UrlNormalizer::normalize("https://x.com/a?a=1");
        assert_ne!(base, UrlNormalizer::normalize("http://x.com/a?a=1"));
        assert_ne!(base, UrlNormalizer::normalize("https://y.com/a?a=1"));
        assert_ne!(base, UrlNormalizer::normalize("https://x.com/b?a=1"));
        assert_ne!(base, UrlNormalizer::normalize("https://x.com/a?a=2"));
    }

    #[test]
    fn test_unparsable_returned_unchanged() {
        assert_eq!(UrlNormalizer::normalize("not a url"), "not a url");
        assert_eq!(UrlNormalizer::normalize(""), "");
    }
}
