//! Turns a resolved request into continue-or-redirect plus cookie effects.

use super::resolver::{NegotiationSource, ResolvedLocaleRequest};
use axum::http::StatusCode;

/// What happens to the request itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Serve the request as is
    Continue,
    /// Send the client to a locale-qualified URL
    Redirect { location: String, status: StatusCode },
}

/// The full routing outcome for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingAction {
    pub disposition: Disposition,

    /// Locale to store in the preference cookie, if it should be written
    pub set_cookie: Option<String>,
}

impl RoutingAction {
    pub fn is_redirect(&self) -> bool {
        matches!(self.disposition, Disposition::Redirect { .. })
    }

    pub fn location(&self) -> Option<&str> {
        match &self.disposition {
            Disposition::Redirect { location, .. } => Some(location),
            Disposition::Continue => None,
        }
    }
}

/// Decide what to do with a resolved request.
///
/// - Qualified paths continue. The cookie is refreshed only when the client
///   sent one that names a different locale.
/// - Unqualified paths get a 307 to `/{locale}{path}`, query preserved. The
///   cookie is written only when the locale came from Accept-Language, so a
///   default-locale fallback never pins the visitor.
pub fn apply(resolved: &ResolvedLocaleRequest) -> RoutingAction {
    if !resolved.needs_redirect {
        let set_cookie = resolved
            .cookie_locale
            .as_deref()
            .filter(|cookie| *cookie != resolved.negotiated_locale)
            .map(|_| resolved.negotiated_locale.clone());

        return RoutingAction {
            disposition: Disposition::Continue,
            set_cookie,
        };
    }

    let set_cookie = (resolved.source == NegotiationSource::AcceptLanguage)
        .then(|| resolved.negotiated_locale.clone());

    RoutingAction {
        disposition: Disposition::Redirect {
            location: redirect_location(resolved),
            status: StatusCode::TEMPORARY_REDIRECT,
        },
        set_cookie,
    }
}

/// `/foo?x=1` for `zh-CN` becomes `/zh-CN/foo?x=1`; `/` becomes `/zh-CN`.
pub fn redirect_location(resolved: &ResolvedLocaleRequest) -> String {
    let rest = if resolved.path == "/" {
        ""
    } else {
        resolved.path.as_str()
    };

    match &resolved.query {
        Some(query) => format!("/{}{}?{}", resolved.negotiated_locale, rest, query),
        None => format!("/{}{}", resolved.negotiated_locale, rest),
    }
}
