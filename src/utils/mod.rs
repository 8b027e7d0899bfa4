//! 工具模块：URL归一化、URL拆解与徽标文本
pub mod url_normalizer;
pub mod tab_url;

pub use self::url_normalizer::UrlNormalizer;
pub use self::tab_url::TabUrl;

/// 徽标文本：超过99显示为 `99+`
pub fn badge_text(count: usize) -> String {
    if count > 99 {
        "99+".to_string()
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_text() {
        assert_eq!(badge_text(0), "0");
        assert_eq!(badge_text(99), "99");
        assert_eq!(badge_text(100), "99+");
    }
}
