//! Locale registry: single source of truth for all supported locales.
//!
//! The registry is built once at startup and shared read-only (behind an
//! `Arc`) with every component that needs it. Construction validates the
//! registry invariants and fails with a [`ConfigurationError`] otherwise.

use crate::error::ConfigurationError;
use crate::i18n::locale::{parse_tag, Locale};
use std::collections::HashSet;

/// Configuration for a supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Locale identifier (e.g. "en", "zh-CN")
    pub id: String,

    /// Human-readable label (e.g. "English", "简体中文")
    pub label: String,

    /// Document language tag; defaults to `id` when `None`
    pub lang: Option<String>,
}

impl LocaleConfig {
    /// Create a locale configuration whose `lang` is the id itself.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            lang: None,
        }
    }
}

/// Ordered, validated set of supported locales.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<Locale>,
    default_index: usize,
}

impl LocaleRegistry {
    /// Build a registry from locale configurations.
    ///
    /// # Arguments
    /// * `configs` - Locales in display order
    /// * `default_id` - Identifier of the default locale
    ///
    /// # Returns
    /// * `Ok(LocaleRegistry)` if ids are unique, well formed, and the default exists
    /// * `Err(ConfigurationError)` otherwise
    pub fn new(configs: Vec<LocaleConfig>, default_id: &str) -> Result<Self, ConfigurationError> {
        if configs.is_empty() {
            return Err(ConfigurationError::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        let mut langids = Vec::with_capacity(configs.len());
        for config in &configs {
            // Ids appear verbatim in paths, so only the canonical spelling is accepted
            let langid = parse_tag(&config.id)
                .filter(|langid| langid.to_string() == config.id)
                .ok_or_else(|| ConfigurationError::InvalidLocaleId(config.id.clone()))?;
            if !seen.insert(config.id.as_str()) {
                return Err(ConfigurationError::DuplicateLocale(config.id.clone()));
            }
            langids.push(langid);
        }

        let default_index = configs
            .iter()
            .position(|config| config.id == default_id)
            .ok_or_else(|| ConfigurationError::MissingDefault(default_id.to_string()))?;

        let locales = configs
            .iter()
            .zip(langids)
            .enumerate()
            .map(|(index, (config, langid))| {
                Locale::new(
                    langid,
                    &config.label,
                    config.lang.as_deref().unwrap_or(&config.id),
                    index == default_index,
                )
            })
            .collect();

        Ok(Self {
            locales,
            default_index,
        })
    }

    /// The locale set shared by every app in the family, with English as default.
    pub fn app_family() -> Self {
        Self {
            locales: app_family_locales()
                .iter()
                .filter_map(|config| Some((parse_tag(&config.id)?, config)))
                .enumerate()
                .map(|(index, (langid, config))| {
                    Locale::new(langid, &config.label, &config.id, index == 0)
                })
                .collect(),
            default_index: 0,
        }
    }

    /// Get a locale by its exact identifier.
    pub fn get(&self, id: &str) -> Option<&Locale> {
        self.locales.iter().find(|locale| locale.id() == id)
    }

    /// Get a locale by identifier, ignoring ASCII case.
    pub fn get_ignore_case(&self, id: &str) -> Option<&Locale> {
        self.locales
            .iter()
            .find(|locale| locale.id().eq_ignore_ascii_case(id))
    }

    /// Get the first locale (in registry order) sharing the primary language
    /// subtag of `tag`.
    pub fn find_by_primary_subtag(&self, tag: &str) -> Option<&Locale> {
        let language = parse_tag(tag)?.language;
        self.locales
            .iter()
            .find(|locale| locale.langid().language == language)
    }

    /// Get the default locale.
    pub fn default_locale(&self) -> &Locale {
        &self.locales[self.default_index]
    }

    /// Get all locales in registry order.
    pub fn all(&self) -> &[Locale] {
        &self.locales
    }

    /// Get all locale identifiers in registry order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(Locale::id)
    }

    /// Check if an identifier is registered (exact match).
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

/// Locales of the application family.
///
/// The first entry is the default.
pub fn app_family_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig::new("en", "English"),
        LocaleConfig::new("zh-CN", "简体中文"),
        LocaleConfig::new("ja", "日本語"),
        LocaleConfig::new("sv", "Svenska"),
        LocaleConfig::new("ar", "العربية"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_locales() -> Vec<LocaleConfig> {
        vec![
            LocaleConfig::new("en", "English"),
            LocaleConfig::new("zh-CN", "简体中文"),
        ]
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_marks_single_default() {
        let registry = LocaleRegistry::new(two_locales(), "zh-CN").expect("Should build");

        assert_eq!(registry.default_locale().id(), "zh-CN");
        let defaults: Vec<_> = registry.all().iter().filter(|l| l.is_default()).collect();
        assert_eq!(defaults.len(), 1);
    }

    #[test]
    fn test_new_missing_default() {
        let result = LocaleRegistry::new(two_locales(), "fr");
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::MissingDefault("fr".to_string())
        );
    }

    #[test]
    fn test_new_duplicate_locale() {
        let mut configs = two_locales();
        configs.push(LocaleConfig::new("en", "English again"));

        let result = LocaleRegistry::new(configs, "en");
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicateLocale("en".to_string())
        );
    }

    #[test]
    fn test_new_empty() {
        let result = LocaleRegistry::new(Vec::new(), "en");
        assert_eq!(result.unwrap_err(), ConfigurationError::EmptyRegistry);
    }

    #[test]
    fn test_new_invalid_id() {
        let result = LocaleRegistry::new(vec![LocaleConfig::new("en/..", "Bad")], "en/..");
        assert!(matches!(
            result.unwrap_err(),
            ConfigurationError::InvalidLocaleId(_)
        ));
    }

    #[test]
    fn test_new_rejects_misplaced_subtags() {
        for id in ["en-a", "zh-x", "en-US-US-US"] {
            let result = LocaleRegistry::new(vec![LocaleConfig::new(id, "Bad")], id);
            assert_eq!(
                result.unwrap_err(),
                ConfigurationError::InvalidLocaleId(id.to_string())
            );
        }
    }

    #[test]
    fn test_new_rejects_non_canonical_id() {
        let result = LocaleRegistry::new(vec![LocaleConfig::new("zh-cn", "简体中文")], "zh-cn");
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::InvalidLocaleId("zh-cn".to_string())
        );
    }

    #[test]
    fn test_lang_defaults_to_id() {
        let mut configs = two_locales();
        configs[0].lang = Some("en-US".to_string());

        let registry = LocaleRegistry::new(configs, "en").expect("Should build");
        assert_eq!(registry.get("en").unwrap().lang(), "en-US");
        assert_eq!(registry.get("zh-CN").unwrap().lang(), "zh-CN");
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_is_exact() {
        let registry = LocaleRegistry::app_family();
        assert!(registry.get("zh-CN").is_some());
        assert!(registry.get("zh-cn").is_none());
        assert!(registry.get("zh").is_none());
    }

    #[test]
    fn test_get_ignore_case() {
        let registry = LocaleRegistry::app_family();
        assert_eq!(registry.get_ignore_case("ZH-cn").unwrap().id(), "zh-CN");
    }

    #[test]
    fn test_find_by_primary_subtag() {
        let registry = LocaleRegistry::app_family();
        assert_eq!(registry.find_by_primary_subtag("zh").unwrap().id(), "zh-CN");
        assert_eq!(registry.find_by_primary_subtag("zh-TW").unwrap().id(), "zh-CN");
        assert_eq!(registry.find_by_primary_subtag("EN-gb").unwrap().id(), "en");
        assert!(registry.find_by_primary_subtag("fr").is_none());
    }

    #[test]
    fn test_all_preserves_order() {
        let registry = LocaleRegistry::app_family();
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec!["en", "zh-CN", "ja", "sv", "ar"]);
    }

    #[test]
    fn test_app_family_default_is_english() {
        let registry = LocaleRegistry::app_family();
        assert_eq!(registry.default_locale().id(), "en");
        assert!(registry.default_locale().is_default());
        assert_eq!(registry.get("ar").unwrap().label(), "العربية");
    }

    #[test]
    fn test_contains() {
        let registry = LocaleRegistry::app_family();
        assert!(registry.contains("sv"));
        assert!(!registry.contains("xx"));
        assert!(!registry.contains(""));
    }
}
