//! axum adapter for the locale pipeline.

use super::{Disposition, LocalePipeline, PipelineDecision};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Locale of a routed request, available to handlers as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLocale(pub String);

/// Apply locale routing to every request.
///
/// Install with `axum::middleware::from_fn_with_state(pipeline, locale_middleware)`.
pub async fn locale_middleware(
    State(pipeline): State<Arc<LocalePipeline>>,
    mut request: Request,
    next: Next,
) -> Response {
    let (resolved, action) = match pipeline.evaluate_request(request.uri(), request.headers()) {
        PipelineDecision::Excluded => return next.run(request).await,
        PipelineDecision::Routed { resolved, action } => (resolved, action),
    };

    let set_cookie = action.set_cookie.as_deref().and_then(|locale| {
        let value = pipeline.cookie_policy().set_cookie_header(locale);
        HeaderValue::from_str(&value)
            .map_err(|e| warn!("Cannot encode locale cookie for {}: {}", locale, e))
            .ok()
    });

    let mut response = match action.disposition {
        Disposition::Redirect { location, status } => {
            debug!(
                "Redirecting {} to {} (locale from {:?})",
                resolved.path, location, resolved.source
            );
            (status, [(header::LOCATION, location)]).into_response()
        }
        Disposition::Continue => {
            request
                .extensions_mut()
                .insert(ActiveLocale(resolved.negotiated_locale));
            next.run(request).await
        }
    };

    if let Some(cookie) = set_cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
