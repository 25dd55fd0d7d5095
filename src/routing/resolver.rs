//! Works out which locale a request is for.

use super::negotiation::negotiate;
use crate::i18n::LocaleRegistry;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Where the negotiated locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NegotiationSource {
    /// The first path segment is a registered locale
    Path,
    /// The stored preference cookie
    Cookie,
    /// The browser's Accept-Language header
    AcceptLanguage,
    /// Nothing else matched
    Default,
}

/// Everything the routing decision needs to know about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocaleRequest {
    /// Request path, always starting with `/`
    pub path: String,

    /// Raw query string, without the `?`
    pub query: Option<String>,

    /// Locale named by the first path segment, if any
    pub path_locale: Option<String>,

    /// Raw value of the locale cookie, registered or not
    pub cookie_locale: Option<String>,

    /// The locale the request should be served in
    pub negotiated_locale: String,

    pub source: NegotiationSource,

    /// True when the path carries no locale and must be redirected
    pub needs_redirect: bool,
}

/// Resolves request paths against a locale registry.
#[derive(Debug, Clone)]
pub struct PathLocaleResolver {
    registry: Arc<LocaleRegistry>,
}

impl PathLocaleResolver {
    pub fn new(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Resolve the locale for a request.
    ///
    /// A path is locale-qualified only when its first segment is exactly a
    /// registered id; `/EN/foo` and `/fr/foo` are unqualified. For
    /// unqualified paths the cookie wins over Accept-Language, which wins
    /// over the default locale.
    pub fn resolve(
        &self,
        path: &str,
        query: Option<&str>,
        cookie_locale: Option<&str>,
        accept_language: Option<&str>,
    ) -> ResolvedLocaleRequest {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let first_segment = path[1..].split('/').next().unwrap_or_default();
        let path_locale = self.registry.get(first_segment).map(|l| l.id().to_string());

        let (negotiated_locale, source) = match &path_locale {
            Some(locale) => (locale.clone(), NegotiationSource::Path),
            None => self.negotiate_unqualified(cookie_locale, accept_language),
        };

        ResolvedLocaleRequest {
            needs_redirect: path_locale.is_none(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
            cookie_locale: cookie_locale.map(str::to_string),
            path,
            path_locale,
            negotiated_locale,
            source,
        }
    }

    fn negotiate_unqualified(
        &self,
        cookie_locale: Option<&str>,
        accept_language: Option<&str>,
    ) -> (String, NegotiationSource) {
        if let Some(cookie) = cookie_locale {
            match self.registry.get(cookie) {
                Some(locale) => return (locale.id().to_string(), NegotiationSource::Cookie),
                None => debug!("Ignoring unregistered locale cookie: {}", cookie),
            }
        }

        if let Some(locale) = accept_language.and_then(|h| negotiate(&self.registry, h)) {
            return (locale.id().to_string(), NegotiationSource::AcceptLanguage);
        }

        (
            self.registry.default_locale().id().to_string(),
            NegotiationSource::Default,
        )
    }
}
