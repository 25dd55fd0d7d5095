//! Paths that bypass locale routing entirely.

/// Prefixes skipped by the locale pipeline: API routes, framework assets and
/// well-known static files.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "/api",
    "/_next/static",
    "/_next/image",
    "/favicon.ico",
    "/opengraph-image",
    "/robots.txt",
    "/sitemap.xml",
    "/.well-known",
];

/// Literal list of excluded path prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    prefixes: Vec<String>,
}

impl ExclusionList {
    /// An exclusion list with no entries.
    pub fn empty() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Add a prefix. A missing leading slash is added.
    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        let prefix = prefix.as_ref().trim();
        if prefix.is_empty() || prefix == "/" {
            return self;
        }

        let prefix = if prefix.starts_with('/') {
            prefix.trim_end_matches('/').to_string()
        } else {
            format!("/{}", prefix.trim_end_matches('/'))
        };
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
        self
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Check if `path` is excluded from locale routing.
    ///
    /// A prefix matches the path itself, anything below it (`/api/og`), and
    /// variants that continue with `.` or `-` (`/opengraph-image-1a2b`), but
    /// not unrelated words that merely share its letters (`/apiary`).
    pub fn is_excluded(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '.', '-']))
        })
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        DEFAULT_EXCLUDED_PREFIXES
            .iter()
            .fold(Self::empty(), |list, prefix| list.with_prefix(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_api_and_static_files() {
        let list = ExclusionList::default();
        assert!(list.is_excluded("/api"));
        assert!(list.is_excluded("/api/og"));
        assert!(list.is_excluded("/robots.txt"));
        assert!(list.is_excluded("/sitemap.xml"));
        assert!(list.is_excluded("/favicon.ico"));
        assert!(list.is_excluded("/_next/static/chunks/main.js"));
        assert!(list.is_excluded("/_next/image"));
        assert!(list.is_excluded("/.well-known/security.txt"));
        assert!(list.is_excluded("/opengraph-image"));
        assert!(list.is_excluded("/opengraph-image-1a2b3c"));
    }

    #[test]
    fn test_default_keeps_page_routes() {
        let list = ExclusionList::default();
        assert!(!list.is_excluded("/"));
        assert!(!list.is_excluded("/foo"));
        assert!(!list.is_excluded("/en/api"));
        assert!(!list.is_excluded("/apiary"));
        assert!(!list.is_excluded("/_next"));
    }

    #[test]
    fn test_with_prefix_normalizes() {
        let list = ExclusionList::empty()
            .with_prefix("manifest.json")
            .with_prefix("/healthz/")
            .with_prefix("/healthz")
            .with_prefix("  ")
            .with_prefix("/");

        assert_eq!(list.prefixes(), &["/manifest.json", "/healthz"]);
        assert!(list.is_excluded("/manifest.json"));
        assert!(list.is_excluded("/healthz/live"));
    }

    #[test]
    fn test_empty_excludes_nothing() {
        let list = ExclusionList::empty();
        assert!(!list.is_excluded("/api/og"));
    }
}
