//! Request hook that runs the i18n handler for blog paths

use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::RequestLocals;
use crate::config::BlogConfig;
use crate::error::Result;

/// Caller-supplied i18n step, run before blog requests are handled
pub type I18nHandler = Arc<dyn Fn(&mut Request) -> Result<()> + Send + Sync>;

#[derive(Clone)]
pub struct I18nHookState {
    config: Arc<BlogConfig>,
    handler: I18nHandler,
}

impl I18nHookState {
    pub fn new(config: Arc<BlogConfig>, handler: I18nHandler) -> Self {
        Self { config, handler }
    }

    fn applies_to(&self, path: &str) -> bool {
        if !self.config.i18n.enabled {
            return false;
        }
        let base = self.config.base_uri();
        base.is_empty()
            || path == base
            || path
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Middleware: when i18n is enabled and the request is under the blog URI,
/// run the handler. A failing handler is logged and the request continues.
pub async fn i18n_hook(
    State(state): State<Arc<I18nHookState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if state.applies_to(request.uri().path()) {
        if let Err(e) = (state.handler)(&mut request) {
            tracing::error!("i18n handler failed for {}: {}", request.uri().path(), e);
        }
    }
    next.run(request).await
}

#[derive(Debug, Deserialize)]
struct LangParams {
    lang: Option<String>,
}

/// Locale asked for by a request: the `lang` query parameter, else the
/// first `Accept-Language` entry. Only configured languages are accepted.
pub fn locale_from_request(config: &BlogConfig, request: &Request) -> Option<String> {
    let from_query = Query::<LangParams>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(params)| params.lang);

    let from_header = || {
        request
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|tag| {
                let tag = tag.split(';').next().unwrap_or(tag).trim();
                tag.split('-').next().unwrap_or(tag).to_lowercase()
            })
    };

    from_query
        .or_else(from_header)
        .filter(|lang| config.i18n.languages.iter().any(|known| known == lang))
}

/// Handler that stores [`locale_from_request`] in the request's
/// [`RequestLocals`]
pub fn default_i18n_handler(config: Arc<BlogConfig>) -> I18nHandler {
    Arc::new(move |request: &mut Request| -> Result<()> {
        if let Some(locale) = locale_from_request(&config, request) {
            request.extensions_mut().insert(RequestLocals {
                locale: Some(locale),
            });
        }
        Ok(())
    })
}
