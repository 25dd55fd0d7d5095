use crate::error::ConfigurationError;
use crate::i18n::{
    app_family_locales, BundleSource, DirectoryBundleSource, HttpBundleSource, LoaderOptions,
    LocaleConfig, LocaleRegistry,
};
use crate::retry::RetryConfig;
use crate::routing::{CookiePolicy, ExclusionList, LocalePipeline};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Locales
    pub default_locale: String,
    pub locales: Vec<LocaleConfig>,

    // Dictionary bundles
    pub dictionary_dir: PathBuf,
    pub dictionary_base_url: Option<String>,
    pub fetch_timeout_secs: u64,
    pub preload_dictionaries: bool,

    // Routing
    pub cookie_name: String,
    pub cookie_max_age_days: u64,
    pub extra_excluded_paths: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: env_parse("PORT", 3000)?,

            // Locales
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
            locales: match std::env::var("LOCALES") {
                Ok(value) => parse_locales(&value).context("LOCALES is invalid")?,
                Err(_) => app_family_locales(),
            },

            // Dictionary bundles
            dictionary_dir: std::env::var("DICTIONARY_DIR")
                .unwrap_or_else(|_| "dictionaries".to_string())
                .into(),
            dictionary_base_url: std::env::var("DICTIONARY_BASE_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            fetch_timeout_secs: env_parse("DICTIONARY_FETCH_TIMEOUT_SECS", 10)?,
            preload_dictionaries: env_parse("PRELOAD_DICTIONARIES", false)?,

            // Routing
            cookie_name: std::env::var("LOCALE_COOKIE_NAME")
                .unwrap_or_else(|_| CookiePolicy::DEFAULT_NAME.to_string()),
            cookie_max_age_days: env_parse("LOCALE_COOKIE_MAX_AGE_DAYS", 365)?,
            extra_excluded_paths: std::env::var("EXTRA_EXCLUDED_PATHS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        })
    }

    /// Build and validate the locale registry.
    pub fn build_registry(&self) -> Result<LocaleRegistry, ConfigurationError> {
        LocaleRegistry::new(self.locales.clone(), &self.default_locale)
    }

    /// The bundle source: HTTP when a base URL is configured, the local
    /// directory otherwise.
    pub fn bundle_source(&self) -> Result<Arc<dyn BundleSource>> {
        match &self.dictionary_base_url {
            Some(base_url) => {
                let client = reqwest::Client::builder()
                    .user_agent(concat!("i18n-gateway/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .context("Failed to build HTTP client")?;
                Ok(Arc::new(HttpBundleSource::new(client, base_url.clone())))
            }
            None => Ok(Arc::new(DirectoryBundleSource::new(
                self.dictionary_dir.clone(),
            ))),
        }
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            fetch_timeout: Some(Duration::from_secs(self.fetch_timeout_secs)),
            retry: RetryConfig::bundle_fetch(),
        }
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::new(
            self.cookie_name.clone(),
            Duration::from_secs(self.cookie_max_age_days.saturating_mul(24 * 60 * 60)),
        )
    }

    pub fn exclusions(&self) -> ExclusionList {
        self.extra_excluded_paths
            .iter()
            .fold(ExclusionList::default(), |list, prefix| list.with_prefix(prefix))
    }

    pub fn pipeline(&self, registry: Arc<LocaleRegistry>) -> LocalePipeline {
        LocalePipeline::new(registry)
            .with_exclusions(self.exclusions())
            .with_cookie_policy(self.cookie_policy())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            default_locale: "en".to_string(),
            locales: app_family_locales(),
            dictionary_dir: PathBuf::from("dictionaries"),
            dictionary_base_url: None,
            fetch_timeout_secs: 10,
            preload_dictionaries: false,
            cookie_name: CookiePolicy::DEFAULT_NAME.to_string(),
            cookie_max_age_days: 365,
            extra_excluded_paths: Vec::new(),
        }
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, value)),
        Err(_) => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `id=Label,id=Label`. A bare `id` uses the id as its label.
fn parse_locales(value: &str) -> Result<Vec<LocaleConfig>> {
    let locales: Vec<LocaleConfig> = split_list(value)
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((id, label)) => LocaleConfig::new(id.trim(), label.trim()),
            None => LocaleConfig::new(entry.clone(), entry),
        })
        .collect();

    anyhow::ensure!(!locales.is_empty(), "no locales listed");
    Ok(locales)
}
