//! The preferred-locale cookie.

use std::time::Duration;

/// Name and lifetime of the locale cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Cookie name, shared by every app in the family
    pub name: String,

    /// How long browsers keep the cookie
    pub max_age: Duration,
}

impl CookiePolicy {
    pub const DEFAULT_NAME: &'static str = "locale";

    pub fn new(name: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            max_age,
        }
    }

    /// Find this policy's cookie in a `Cookie` request header value.
    pub fn read<'h>(&self, cookie_header: &'h str) -> Option<&'h str> {
        cookie_header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == self.name)
            .map(|(_, value)| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
    }

    /// Build the `Set-Cookie` header value storing `locale`.
    pub fn set_cookie_header(&self, locale: &str) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.name,
            locale,
            self.max_age.as_secs()
        )
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, Duration::from_secs(365 * 24 * 60 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_single_cookie() {
        let policy = CookiePolicy::default();
        assert_eq!(policy.read("locale=zh-CN"), Some("zh-CN"));
    }

    #[test]
    fn test_read_among_other_cookies() {
        let policy = CookiePolicy::default();
        assert_eq!(
            policy.read("session=abc; locale=ja; theme=dark"),
            Some("ja")
        );
    }

    #[test]
    fn test_read_ignores_similar_names() {
        let policy = CookiePolicy::default();
        assert_eq!(policy.read("next-locale=sv; locale_old=ar"), None);
    }

    #[test]
    fn test_read_quoted_and_empty() {
        let policy = CookiePolicy::default();
        assert_eq!(policy.read("locale=\"sv\""), Some("sv"));
        assert_eq!(policy.read("locale="), None);
        assert_eq!(policy.read(""), None);
    }

    #[test]
    fn test_read_custom_name() {
        let policy = CookiePolicy::new("preferred-locale", Duration::from_secs(60));
        assert_eq!(policy.read("locale=en; preferred-locale=ar"), Some("ar"));
    }

    #[test]
    fn test_set_cookie_header() {
        let policy = CookiePolicy::default();
        assert_eq!(
            policy.set_cookie_header("zh-CN"),
            "locale=zh-CN; Path=/; Max-Age=31536000; SameSite=Lax"
        );
    }
}
