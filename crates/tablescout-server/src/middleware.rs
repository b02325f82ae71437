//! Request id, bearer auth and rate limiting layers.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const API_KEYS_VAR: &str = "TABLESCOUT_API_KEYS";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one request, echoed in `x-request-id` and `meta.request_id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuses a non-blank `x-request-id` from the caller, otherwise mints a `UUIDv4`.
    fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        Self(supplied.map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned))
    }

    fn of(req: &Request) -> String {
        req.extensions()
            .get::<Self>()
            .map(|id| id.0.clone())
            .unwrap_or_default()
    }
}

/// Bearer keys accepted on the search routes.
#[derive(Debug, Clone)]
pub struct AuthState {
    keys: Arc<[String]>,
}

impl AuthState {
    /// Reads comma-separated keys from `TABLESCOUT_API_KEYS`.
    ///
    /// # Errors
    ///
    /// Fails when no keys are configured outside development.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var(API_KEYS_VAR).unwrap_or_default();
        Self::from_keys(&raw, is_development)
    }

    /// # Errors
    ///
    /// Fails when `raw` holds no keys and `is_development` is false.
    pub fn from_keys(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        keys.sort_unstable();
        keys.dedup();

        match (keys.is_empty(), is_development) {
            (false, _) => Ok(Self { keys: keys.into() }),
            (true, true) => {
                tracing::warn!("{API_KEYS_VAR} is empty; search routes are open");
                Ok(Self::disabled())
            }
            (true, false) => anyhow::bail!("{API_KEYS_VAR} must list at least one key"),
        }
    }

    /// No keys configured: every request passes.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            keys: Arc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Compares against every key without short-circuiting.
    fn allows(&self, token: &str) -> bool {
        self.keys
            .iter()
            .fold(false, |hit, key| hit | bool::from(key.as_bytes().ct_eq(token.as_bytes())))
    }
}

/// Fixed-window limiter shared by every protected route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    // (window start, requests admitted in it)
    current: Arc<Mutex<(Instant, usize)>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new((Instant::now(), 0))),
        }
    }

    /// Counts one request against the current window; `false` once it is full.
    pub async fn try_acquire(&self) -> bool {
        let mut current = self.current.lock().await;
        let now = Instant::now();
        if now.duration_since(current.0) >= self.window {
            *current = (now, 0);
        }
        if current.1 >= self.max_requests {
            return false;
        }
        current.1 += 1;
        true
    }
}

/// Tags the request with a [`RequestId`] and copies it onto the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let header = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut res = next.run(req).await;
    if let Some(header) = header {
        res.headers_mut().insert(REQUEST_ID_HEADER, header);
    }
    res
}

/// Rejects requests without an accepted bearer key while auth is enabled.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.is_enabled() || bearer_token(req.headers()).is_some_and(|t| auth.allows(t)) {
        return next.run(req).await;
    }
    ApiError::new(
        RequestId::of(&req),
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire().await {
        return next.run(req).await;
    }
    tracing::warn!(max_requests = limiter.max_requests, "rate limit exceeded");
    ApiError::new(RequestId::of(&req), "rate_limited", "rate limit exceeded").into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}
