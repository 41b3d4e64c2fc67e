/**
 * Rate Limiting Middleware
 *
 * Sliding-log limiter keyed by client address. Each key keeps the instants
 * of its recent hits; a request is admitted while fewer than `max_requests`
 * hits fall inside the rolling window.
 *
 * | Limiter | Routes                              | Limit        |
 * |---------|-------------------------------------|--------------|
 * | login   | `POST /api/auth/login`              | 5 / 15 min   |
 * | reset   | `POST /api/auth/forgot-password`,   | 3 / 1 hour   |
 * |         | `POST /api/auth/reset-password`     | (shared)     |
 *
 * The client address is the first `X-Forwarded-For` entry, else the socket
 * peer, else one shared `unknown` bucket.
 */

use crate::backend::auth::AuthState;
use crate::backend::error::BackendError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const LOGIN_LIMIT_MESSAGE: &str =
    "Demasiados intentos de inicio de sesión, inténtalo más tarde";
pub const RESET_LIMIT_MESSAGE: &str =
    "Demasiadas solicitudes de restablecimiento de contraseña, inténtalo más tarde";

/// Rate limit configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl RateLimitConfig {
    /// 5 attempts per 15 minutes
    pub fn login() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
        }
    }

    /// 3 requests per hour
    pub fn password_reset() -> Self {
        Self {
            max_requests: 3,
            window: Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug)]
struct HitLogs {
    logs: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl HitLogs {
    /// Forget keys with no hit inside the window
    fn sweep(&mut self, now: Instant, window: Duration) {
        self.logs.retain(|_, log| {
            log.back()
                .is_some_and(|last| now.saturating_duration_since(*last) < window)
        });
        self.last_sweep = now;
    }
}

/// Per-key sliding-log limiter
///
/// Idle keys are swept at most once per window from inside `check`, so the
/// map only holds clients seen during roughly the last two windows.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    hits: Arc<Mutex<HitLogs>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            hits: Arc::new(Mutex::new(HitLogs {
                logs: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Record a hit for `key` if it is still within the limit
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let window = self.config.window;
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        if now.saturating_duration_since(hits.last_sweep) >= window {
            hits.sweep(now, window);
        }

        let log = hits.logs.entry(key.to_string()).or_default();
        while let Some(oldest) = log.front() {
            if now.saturating_duration_since(*oldest) >= window {
                log.pop_front();
            } else {
                break;
            }
        }

        if log.len() >= self.config.max_requests {
            return false;
        }
        log.push_back(now);
        true
    }

    pub fn tracked_keys(&self) -> usize {
        self.hits.lock().unwrap_or_else(|e| e.into_inner()).logs.len()
    }
}

/// Key identifying the caller of `request`
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn limit(limiter: &RateLimiter, message: &'static str, request: &Request) -> Option<Response> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(request.headers(), peer);

    if limiter.check(&key) {
        return None;
    }
    tracing::warn!("[RateLimit] {} {} rejected for {}", request.method(), request.uri().path(), key);
    Some(BackendError::handler(StatusCode::TOO_MANY_REQUESTS, message).into_response())
}

/// Login limiter (`POST /api/auth/login`)
pub async fn login_rate_limit(State(auth): State<AuthState>, request: Request, next: Next) -> Response {
    match limit(&auth.login_limiter, LOGIN_LIMIT_MESSAGE, &request) {
        Some(rejection) => rejection,
        None => next.run(request).await,
    }
}

/// Password-reset limiter shared by forgot-password and reset-password
pub async fn reset_rate_limit(State(auth): State<AuthState>, request: Request, next: Next) -> Response {
    match limit(&auth.reset_limiter, RESET_LIMIT_MESSAGE, &request) {
        Some(rejection) => rejection,
        None => next.run(request).await,
    }
}
