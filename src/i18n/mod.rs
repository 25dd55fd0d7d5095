//! Internationalization (i18n) module: locales and their dictionaries.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales
//! - `locale`: The immutable `Locale` type held by the registry
//! - `dictionary`: Nested message mapping with dotted-path lookup
//! - `bundle`: Sources of raw dictionary bundles (directory, HTTP, in-memory)
//! - `loader`: Async single-flight dictionary cache
//! - `validator`: Completeness checks against the default locale
//! - `metrics`: Loader observability
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use i18n_gateway::i18n::{DictionaryLoader, DirectoryBundleSource, LocaleRegistry};
//!
//! let registry = Arc::new(LocaleRegistry::app_family());
//! let loader = DictionaryLoader::new(registry, Arc::new(DirectoryBundleSource::new("dictionaries")));
//!
//! let messages = loader.load_with_fallback("zh-CN").await?;
//! let title = messages.text_or_key("title");
//! ```

mod bundle;
mod dictionary;
mod loader;
mod locale;
mod metrics;
mod registry;
mod validator;

pub use bundle::{BundleSource, DirectoryBundleSource, HttpBundleSource, StaticBundleSource};
pub use dictionary::{Dictionary, Message};
pub use loader::{DictionaryLoader, LoaderOptions};
pub use locale::Locale;
pub use metrics::{LoaderMetrics, MetricsReport};
pub use registry::{app_family_locales, LocaleConfig, LocaleRegistry};
pub use validator::{DictionaryValidator, ValidationReport};

pub(crate) use locale::parse_tag;
