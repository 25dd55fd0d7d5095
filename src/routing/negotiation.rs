//! Accept-Language parsing and locale matching.
//!
//! The header is a weighted preference list (`zh-CN, zh;q=0.9, en;q=0.5`).
//! Parsing is lenient: entries that cannot be parsed are skipped and
//! negotiation continues with whatever did parse.

use crate::error::MalformedLocaleHint;
use crate::i18n::{parse_tag, Locale, LocaleRegistry};
use std::cmp::Ordering;
use tracing::debug;

/// One entry of an Accept-Language header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    /// Language tag as sent by the client, or `*`
    pub tag: String,

    /// Weight between 0.0 and 1.0 (1.0 when absent)
    pub quality: f32,
}

impl LanguageRange {
    /// Parse a single entry such as `zh-CN;q=0.9`.
    pub fn parse(entry: &str) -> Result<Self, MalformedLocaleHint> {
        let malformed = |reason| MalformedLocaleHint {
            entry: entry.to_string(),
            reason,
        };

        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();

        if tag != "*" && parse_tag(tag).is_none() {
            return Err(malformed("not a language tag"));
        }

        let mut quality = 1.0;
        for param in parts {
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| malformed("parameter without value"))?;
            if !key.trim().eq_ignore_ascii_case("q") {
                continue;
            }

            quality = value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|q| (0.0..=1.0).contains(q))
                .ok_or_else(|| malformed("weight must be a number between 0 and 1"))?;
        }

        Ok(Self {
            tag: tag.to_string(),
            quality,
        })
    }

    /// Check if this is the `*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.tag == "*"
    }
}

/// Parse an Accept-Language header into ranges ordered by preference.
///
/// Ties keep header order. Entries with weight 0 ("not acceptable") and
/// malformed entries are dropped.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match LanguageRange::parse(entry) {
            Ok(range) => Some(range),
            Err(e) => {
                debug!("Ignoring {}", e);
                None
            }
        })
        .filter(|range| range.quality > 0.0)
        .collect();

    ranges.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    ranges
}

/// Pick the best registered locale for an Accept-Language header.
///
/// Ranges are tried in preference order. For each range an exact match
/// (ignoring case) wins over a primary-subtag match, so `zh` selects
/// `zh-CN` and `en-GB` selects `en`. The wildcard selects the default.
///
/// # Returns
/// `None` when nothing in the header matches the registry.
pub fn negotiate<'r>(registry: &'r LocaleRegistry, header: &str) -> Option<&'r Locale> {
    parse_accept_language(header).iter().find_map(|range| {
        if range.is_wildcard() {
            return Some(registry.default_locale());
        }
        registry
            .get_ignore_case(&range.tag)
            .or_else(|| registry.find_by_primary_subtag(&range.tag))
    })
}
