//! Typed errors for the locale registry, the dictionary loader and
//! Accept-Language parsing.

use std::time::Duration;
use thiserror::Error;

/// Startup-time misconfiguration of the locale registry.
///
/// These are fatal: the process must not start serving requests with a
/// registry that violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("locale registry is empty")]
    EmptyRegistry,

    #[error("default locale '{0}' is not present in the locale registry")]
    MissingDefault(String),

    #[error("locale '{0}' is registered more than once")]
    DuplicateLocale(String),

    #[error("'{0}' is not a valid locale identifier")]
    InvalidLocaleId(String),
}

/// Failure to fetch or parse the message bundle for one locale.
///
/// Cloneable so a single failed load can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryLoadError {
    #[error("no dictionary bundle exists for locale '{locale}'")]
    NotFound { locale: String },

    #[error("failed to fetch dictionary bundle for locale '{locale}': {message}")]
    Fetch { locale: String, message: String },

    #[error("dictionary bundle request for locale '{locale}' was rejected with status {status}")]
    Rejected { locale: String, status: u16 },

    #[error("timed out after {timeout:?} fetching dictionary bundle for locale '{locale}'")]
    Timeout { locale: String, timeout: Duration },

    #[error("malformed dictionary bundle for locale '{locale}': {message}")]
    Parse { locale: String, message: String },
}

impl DictionaryLoadError {
    /// The locale whose bundle failed to load.
    pub fn locale(&self) -> &str {
        match self {
            Self::NotFound { locale }
            | Self::Fetch { locale, .. }
            | Self::Rejected { locale, .. }
            | Self::Timeout { locale, .. }
            | Self::Parse { locale, .. } => locale,
        }
    }

    /// Whether another fetch attempt could succeed.
    ///
    /// Missing, rejected and malformed bundles will not fix themselves
    /// between attempts; network and I/O failures might.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Timeout { .. })
    }
}

/// One entry of an Accept-Language style header could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed language range '{entry}': {reason}")]
pub struct MalformedLocaleHint {
    pub entry: String,
    pub reason: &'static str,
}
