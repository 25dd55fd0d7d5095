//! Locale-aware request routing.
//!
//! Every incoming request passes through [`LocalePipeline`]:
//!
//! 1. `exclusion`: API routes and static files bypass routing
//! 2. `resolver`: path segment, cookie, Accept-Language, default
//! 3. `decision`: continue or 307 redirect, plus the cookie to write
//!
//! `middleware` adapts the pipeline to axum. `link` builds locale-aware
//! hrefs for pages that are already routed.

mod cookie;
mod decision;
mod exclusion;
mod link;
mod middleware;
mod negotiation;
mod resolver;

pub use cookie::CookiePolicy;
pub use decision::{apply, redirect_location, Disposition, RoutingAction};
pub use exclusion::{ExclusionList, DEFAULT_EXCLUDED_PREFIXES};
pub use link::{alternates, localize_href, strip_locale, switch_locale, Alternate};
pub use middleware::{locale_middleware, ActiveLocale};
pub use negotiation::{negotiate, parse_accept_language, LanguageRange};
pub use resolver::{NegotiationSource, PathLocaleResolver, ResolvedLocaleRequest};

use crate::i18n::LocaleRegistry;
use axum::http::{header, HeaderMap, Uri};
use std::sync::Arc;

/// Outcome of running a request through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineDecision {
    /// The path is excluded; the request passes through untouched
    Excluded,
    Routed {
        resolved: ResolvedLocaleRequest,
        action: RoutingAction,
    },
}

impl PipelineDecision {
    pub fn action(&self) -> Option<&RoutingAction> {
        match self {
            PipelineDecision::Excluded => None,
            PipelineDecision::Routed { action, .. } => Some(action),
        }
    }
}

/// Exclusion check, locale resolution and routing decision in one place.
#[derive(Debug, Clone)]
pub struct LocalePipeline {
    exclusions: ExclusionList,
    resolver: PathLocaleResolver,
    cookie: CookiePolicy,
}

impl LocalePipeline {
    pub fn new(registry: Arc<LocaleRegistry>) -> Self {
        Self {
            exclusions: ExclusionList::default(),
            resolver: PathLocaleResolver::new(registry),
            cookie: CookiePolicy::default(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionList) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_cookie_policy(mut self, cookie: CookiePolicy) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn cookie_policy(&self) -> &CookiePolicy {
        &self.cookie
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub fn registry(&self) -> &LocaleRegistry {
        self.resolver.registry()
    }

    /// Route a request given its raw parts.
    ///
    /// `cookie_header` is the full `Cookie` header value; the locale cookie
    /// is picked out of it according to the pipeline's [`CookiePolicy`].
    pub fn evaluate(
        &self,
        path: &str,
        query: Option<&str>,
        cookie_header: Option<&str>,
        accept_language: Option<&str>,
    ) -> PipelineDecision {
        if self.exclusions.is_excluded(path) {
            return PipelineDecision::Excluded;
        }

        let cookie_locale = cookie_header.and_then(|h| self.cookie.read(h));
        let resolved = self
            .resolver
            .resolve(path, query, cookie_locale, accept_language);
        let action = apply(&resolved);

        PipelineDecision::Routed { resolved, action }
    }

    /// Route a request given its URI and headers.
    pub fn evaluate_request(&self, uri: &Uri, headers: &HeaderMap) -> PipelineDecision {
        // HTTP/2 clients may split cookies across several headers
        let cookies: Vec<&str> = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        let cookie_header = (!cookies.is_empty()).then(|| cookies.join("; "));

        let accept_language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        self.evaluate(
            uri.path(),
            uri.query(),
            cookie_header.as_deref(),
            accept_language,
        )
    }
}
