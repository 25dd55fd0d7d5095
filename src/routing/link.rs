//! Building locale-aware links.

use crate::i18n::{Locale, LocaleRegistry};
use serde::Serialize;

/// One `hreflang` alternate of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

/// Prefix an internal href with a locale.
///
/// External links (anything starting with `http`) are returned unchanged.
pub fn localize_href(locale: &str, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }

    match href.trim_start_matches('/') {
        "" => format!("/{}", locale),
        rest => format!("/{}/{}", locale, rest),
    }
}

/// Split a leading registered locale off `path`.
///
/// `/zh-CN/about` gives `(Some(zh-CN), "/about")` and `/zh-CN` gives
/// `(Some(zh-CN), "/")`. Paths without a locale come back whole.
pub fn strip_locale<'r, 'p>(
    registry: &'r LocaleRegistry,
    path: &'p str,
) -> (Option<&'r Locale>, &'p str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (segment, rest) = match trimmed.find('/') {
        Some(i) => (&trimmed[..i], &trimmed[i..]),
        None => (trimmed, "/"),
    };

    match registry.get(segment) {
        Some(locale) => (Some(locale), rest),
        None => (None, path),
    }
}

/// The same page in another locale.
pub fn switch_locale(registry: &LocaleRegistry, path: &str, target: &str) -> String {
    let (_, rest) = strip_locale(registry, path);
    localize_href(target, rest)
}

/// The page at `path` in every registered locale, in registry order.
pub fn alternates(registry: &LocaleRegistry, path: &str) -> Vec<Alternate> {
    let (_, rest) = strip_locale(registry, path);
    registry
        .all()
        .iter()
        .map(|locale| Alternate {
            hreflang: locale.id().to_string(),
            href: localize_href(locale.id(), rest),
        })
        .collect()
}
