//! Locale type: one supported language/region of the application family.

use serde::Serialize;
use unic_langid::LanguageIdentifier;

/// A supported locale.
///
/// Locales are created once when the registry is built and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locale {
    /// Identifier used in paths, cookies and bundle names (e.g. "en", "zh-CN")
    id: String,

    /// Human-readable label shown in locale switchers (e.g. "简体中文")
    label: String,

    /// Value for the document `lang` attribute
    lang: String,

    /// Whether this is the registry's default locale
    #[serde(rename = "default")]
    is_default: bool,

    #[serde(skip)]
    langid: LanguageIdentifier,
}

impl Locale {
    /// Create a locale whose id is the canonical form of `langid`.
    pub(crate) fn new(langid: LanguageIdentifier, label: &str, lang: &str, is_default: bool) -> Self {
        Self {
            id: langid.to_string(),
            label: label.to_string(),
            lang: lang.to_string(),
            is_default,
            langid,
        }
    }

    /// Get the locale identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the document language tag.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Check if this is the default locale.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Get the parsed language identifier.
    pub fn langid(&self) -> &LanguageIdentifier {
        &self.langid
    }

    /// Get the primary language subtag (e.g. "zh" for "zh-CN").
    pub fn primary_subtag(&self) -> &str {
        self.langid.language.as_str()
    }
}

/// Parse a language tag such as `zh-CN` or `sr-Latn-RS`.
///
/// Only `-` is accepted as the subtag separator, since tags end up in URL
/// paths and file names.
pub(crate) fn parse_tag(tag: &str) -> Option<LanguageIdentifier> {
    if tag.is_empty() || tag.contains('_') {
        return None;
    }
    tag.parse().ok()
}
