//! Dictionary loader: async, cached, single-flight.
//!
//! The loader is a service object: construct one per process (or per test)
//! and share it behind an `Arc`. Each locale's bundle is fetched at most once
//! for the lifetime of the loader. Concurrent first requests for the same
//! locale await the same in-flight load, while loads of different locales
//! proceed independently.
//!
//! Loads run on their own tokio task, so a request that is dropped while
//! waiting does not cancel the load; the result still lands in the cache.

use crate::error::DictionaryLoadError;
use crate::i18n::{BundleSource, Dictionary, LoaderMetrics, LocaleRegistry};
use crate::retry::{with_retry_if, RetryConfig};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

type LoadResult = Result<Arc<Dictionary>, DictionaryLoadError>;
type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Tuning for bundle fetches.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Upper bound for a single fetch attempt; `None` waits indefinitely
    pub fetch_timeout: Option<Duration>,

    /// Retry policy for transient fetch failures
    pub retry: RetryConfig,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Some(Duration::from_secs(10)),
            retry: RetryConfig::bundle_fetch(),
        }
    }
}

/// Process-scoped dictionary cache and loader.
pub struct DictionaryLoader {
    registry: Arc<LocaleRegistry>,
    source: Arc<dyn BundleSource>,
    options: LoaderOptions,
    cache: DashMap<String, SharedLoad>,
    loaded: Arc<DashSet<String>>,
    metrics: Arc<LoaderMetrics>,
}

impl DictionaryLoader {
    /// Create a loader with default options.
    pub fn new(registry: Arc<LocaleRegistry>, source: Arc<dyn BundleSource>) -> Self {
        Self {
            registry,
            source,
            options: LoaderOptions::default(),
            cache: DashMap::new(),
            loaded: Arc::new(DashSet::new()),
            metrics: Arc::new(LoaderMetrics::new()),
        }
    }

    /// Replace the fetch options.
    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &LoaderMetrics {
        &self.metrics
    }

    /// Description of the bundle source, for logs.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Load the dictionary for `locale`.
    ///
    /// Unregistered locales resolve to the default locale's dictionary. A
    /// fetch or parse failure is returned as a [`DictionaryLoadError`] naming
    /// the locale whose bundle failed.
    pub async fn load(&self, locale: &str) -> Result<Arc<Dictionary>, DictionaryLoadError> {
        let target = self.resolve_locale(locale);
        self.load_registered(target).await
    }

    /// Load the dictionary for `locale`, serving the default locale's
    /// dictionary when the requested one fails.
    ///
    /// Only a failure of the default dictionary itself is returned.
    pub async fn load_with_fallback(
        &self,
        locale: &str,
    ) -> Result<Arc<Dictionary>, DictionaryLoadError> {
        let target = self.resolve_locale(locale);
        let default = self.registry.default_locale().id();

        match self.load_registered(target).await {
            Ok(dictionary) => Ok(dictionary),
            Err(e) if target != default => {
                warn!("{}; falling back to default locale '{}'", e, default);
                self.metrics.record_fallback();
                self.load_registered(default).await
            }
            Err(e) => {
                error!("Default dictionary unavailable: {}", e);
                Err(e)
            }
        }
    }

    /// Load every registered locale concurrently.
    ///
    /// # Returns
    /// The errors of the locales that failed to load (empty when all succeeded).
    pub async fn preload_all(&self) -> Vec<DictionaryLoadError> {
        let loads = self.registry.ids().map(|id| self.load_registered(id));
        let failures: Vec<_> = join_all(loads)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        info!(
            "Preloaded {} of {} dictionaries",
            self.registry.all().len() - failures.len(),
            self.registry.all().len()
        );
        failures
    }

    /// Locales whose dictionaries are loaded and cached, in registry order.
    ///
    /// A load counts as soon as its task finishes, whether or not any
    /// caller is still awaiting it.
    pub fn cached_locales(&self) -> Vec<String> {
        self.registry
            .ids()
            .filter(|id| self.loaded.contains(*id))
            .map(str::to_string)
            .collect()
    }

    fn resolve_locale(&self, locale: &str) -> &str {
        match self.registry.get(locale) {
            Some(registered) => registered.id(),
            None => {
                let default = self.registry.default_locale().id();
                debug!(
                    "Locale '{}' is not registered, using default '{}'",
                    locale, default
                );
                default
            }
        }
    }

    async fn load_registered(&self, locale: &str) -> LoadResult {
        self.shared_load(locale).await
    }

    /// Get the cache entry for `locale`, starting a load if there is none.
    ///
    /// Entries whose load already failed are replaced by a fresh load.
    fn shared_load(&self, locale: &str) -> SharedLoad {
        if let Some(entry) = self.cache.get(locale) {
            if !has_failed(entry.value()) {
                self.metrics.record_cache_hit();
                return entry.value().clone();
            }
        }

        match self.cache.entry(locale.to_string()) {
            Entry::Occupied(mut occupied) => {
                if has_failed(occupied.get()) {
                    debug!("Retrying previously failed dictionary load for '{}'", locale);
                    self.metrics.record_cache_miss();
                    let load = self.spawn_load(locale);
                    occupied.insert(load.clone());
                    load
                } else {
                    self.metrics.record_cache_hit();
                    occupied.get().clone()
                }
            }
            Entry::Vacant(vacant) => {
                self.metrics.record_cache_miss();
                let load = self.spawn_load(locale);
                vacant.insert(load.clone());
                load
            }
        }
    }

    fn spawn_load(&self, locale: &str) -> SharedLoad {
        let locale = locale.to_string();
        let task = tokio::spawn(fetch_dictionary(
            Arc::clone(&self.source),
            Arc::clone(&self.metrics),
            Arc::clone(&self.loaded),
            self.options.clone(),
            locale.clone(),
        ));

        async move {
            match task.await {
                Ok(result) => result,
                Err(join_error) => Err(DictionaryLoadError::Fetch {
                    locale,
                    message: format!("load task failed: {}", join_error),
                }),
            }
        }
        .boxed()
        .shared()
    }
}

fn has_failed(load: &SharedLoad) -> bool {
    matches!(load.peek(), Some(Err(_)))
}

async fn fetch_dictionary(
    source: Arc<dyn BundleSource>,
    metrics: Arc<LoaderMetrics>,
    loaded: Arc<DashSet<String>>,
    options: LoaderOptions,
    locale: String,
) -> LoadResult {
    let operation = format!("Dictionary bundle fetch for '{}'", locale);

    let result = with_retry_if(
        &options.retry,
        &operation,
        || {
            let source = Arc::clone(&source);
            let metrics = Arc::clone(&metrics);
            let locale = locale.clone();
            let fetch_timeout = options.fetch_timeout;
            async move {
                metrics.record_bundle_fetch();
                let fetch = source.fetch_bundle(&locale);
                match fetch_timeout {
                    Some(limit) => match tokio::time::timeout(limit, fetch).await {
                        Ok(result) => result,
                        Err(_) => Err(DictionaryLoadError::Timeout {
                            locale: locale.clone(),
                            timeout: limit,
                        }),
                    },
                    None => fetch.await,
                }
            }
        },
        DictionaryLoadError::is_transient,
    )
    .await
    .and_then(|content| Dictionary::from_json(&locale, &content));

    match result {
        Ok(dictionary) => {
            info!(
                "Loaded dictionary for '{}' ({} top-level entries)",
                locale,
                dictionary.len()
            );
            loaded.insert(locale);
            Ok(Arc::new(dictionary))
        }
        Err(e) => {
            metrics.record_load_failure();
            warn!("Dictionary load failed: {}", e);
            Err(e)
        }
    }
}
