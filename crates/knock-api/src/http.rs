use std::{borrow::Cow, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware,
    response::Response,
};
use knock_core::{EventLog, TracingEventLog};
use knock_model::{Action, RequestContext};
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::ApiError,
    handler::ApiHandler,
    resolve::{RequestMeta, Resolver},
    response::{Outcome, respond},
};

/// Sent on every response, whatever the outcome.
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
    config: HttpConfig,
    log: Arc<dyn EventLog>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>, config: HttpConfig) -> Self {
        Self {
            handler,
            config,
            log: Arc::new(TracingEventLog),
        }
    }

    /// Replace the event sink used for request-level Info/Err messages.
    pub fn with_log(mut self, log: Arc<dyn EventLog>) -> Self {
        self.log = log;
        self
    }

    /// Build axum router.
    ///
    /// Routes (after the configured prefix, case-insensitive):
    /// - /{task}/on  - start task
    /// - /{task}/off - stop task
    /// - /{task}[/*] - start task (no or unknown action)
    /// - anything else - request error
    ///
    /// Needs `ConnectInfo<SocketAddr>` unless a real-IP header is configured.
    pub fn router(self) -> Router {
        let state = ApiState {
            resolver: Arc::new(Resolver::new(&self.config)),
            config: Arc::new(self.config),
            handler: self.handler,
            log: self.log,
        };

        Router::new()
            .fallback(entry::<H>)
            .with_state(state)
            .layer(middleware::map_response(no_cache))
    }
}

struct ApiState<H> {
    handler: Arc<H>,
    config: Arc<HttpConfig>,
    resolver: Arc<Resolver>,
    log: Arc<dyn EventLog>,
}

impl<H> Clone for ApiState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
            resolver: Arc::clone(&self.resolver),
            log: Arc::clone(&self.log),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Task { name: String, action: Action },
    Default,
}

impl<H> ApiState<H>
where
    H: ApiHandler,
{
    /// Lower-case the decoded path, strip the prefix and pick a handler.
    fn route(&self, path: &str) -> Route {
        let lowered = path.to_lowercase();
        let Some(rest) = strip_prefix(&lowered, &self.config.url_prefix) else {
            return Route::Default;
        };

        let mut parts = rest.split('/').skip(1);
        let name = parts.next().unwrap_or_default();
        let action = parts.next().unwrap_or_default();

        if name.is_empty() || !self.handler.has_task(name) {
            return Route::Default;
        }
        Route::Task {
            name: name.to_string(),
            action: Action::from_segment(action),
        }
    }
}

/// Percent-decoded request path; bytes that are not UTF-8 after decoding are rejected.
fn decode_path(raw: &str) -> Result<String, ApiError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| ApiError::MalformedPath(raw.to_string()))
}

/// `path` without `prefix`, only on a segment boundary.
fn strip_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
}

// ============================================================================
// Handlers
// ============================================================================

async fn entry<H>(State(state): State<ApiState<H>>, req: Request) -> Response
where
    H: ApiHandler,
{
    let (mut parts, _) = req.into_parts();
    let path = match decode_path(parts.uri.path()) {
        Ok(path) => path,
        Err(err) => {
            state.log.err(&format!("Bad request: '{}': {err}", parts.uri.path()));
            return respond(Err(err));
        }
    };

    let outcome = match state.route(&path) {
        Route::Task { name, action } => {
            let peer = ConnectInfo::<SocketAddr>::from_request_parts(&mut parts, &())
                .await
                .ok()
                .map(|ConnectInfo(addr)| addr);

            let outcome = task_handler(&state, &parts, peer, name, action).await;
            if let Err(err) = &outcome {
                state.log.err(&format!("Bad request: '{path}': {err}"));
            }
            outcome
        }
        Route::Default => default_handler(&state, &path),
    };

    respond(outcome)
}

/// Catch-all: the path names no configured task.
fn default_handler<H>(state: &ApiState<H>, path: &str) -> Outcome {
    let lowered = path.to_lowercase();
    let rest = strip_prefix(&lowered, &state.config.url_prefix).unwrap_or(&lowered);

    let err = match rest.split('/').nth(1) {
        None | Some("") => ApiError::NoTaskSpecified,
        Some(_) => ApiError::NoSuchTask,
    };
    state.log.err(&format!("Bad request: '{path}': {err}"));
    Err(err)
}

async fn task_handler<H>(
    state: &ApiState<H>,
    parts: &Parts,
    peer: Option<SocketAddr>,
    name: String,
    action: Action,
) -> Outcome
where
    H: ApiHandler,
{
    let meta = RequestMeta {
        uri: &parts.uri,
        headers: &parts.headers,
        peer,
    };
    let (ip, ttl) = state.resolver.resolve(&meta)?;
    debug!(task = %name, %action, %ip, ttl, "request resolved");

    let ctx = RequestContext {
        task: name,
        action,
        ip,
        ttl,
    };
    state.handler.run_task(ctx).await.map(Some)
}

async fn no_cache(mut res: Response) -> Response {
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    res
}
