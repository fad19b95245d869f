use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const WINDOW: Duration = Duration::from_secs(1);
const MAX_TRACKED_CLIENTS: usize = 10_000;

#[derive(Debug)]
struct WindowState {
    start: Instant,
    count: u32,
}

/// Fixed one-second window per client. Clients are keyed by peer address;
/// `X-Forwarded-For` is only honoured when the service sits behind a trusted
/// proxy.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    trust_forwarded: bool,
    windows: Arc<Mutex<HashMap<String, WindowState>>>,
}

impl RateLimiter {
    fn new(rps: u32, trust_forwarded: bool) -> Self {
        Self {
            rps: rps.max(1),
            trust_forwarded,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn allow_at(&self, client: &str, now: Instant) -> bool {
        let mut guard = self.windows.lock().expect("rate limiter mutex poisoned");
        if guard.len() >= MAX_TRACKED_CLIENTS && !guard.contains_key(client) {
            guard.retain(|_, w| now.duration_since(w.start) < WINDOW);
            // still full of live windows: new clients wait for one to expire
            if guard.len() >= MAX_TRACKED_CLIENTS {
                return false;
            }
        }
        let window = guard.entry(client.to_string()).or_insert(WindowState {
            start: now,
            count: 0,
        });
        if now.duration_since(window.start) >= WINDOW {
            window.start = now;
            window.count = 0;
        }
        if window.count < self.rps {
            window.count += 1;
            true
        } else {
            false
        }
    }

    fn allow(&self, client: &str) -> bool {
        self.allow_at(client, Instant::now())
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> String {
    let forwarded = if trust_forwarded {
        forwarded_for(headers)
    } else {
        None
    };
    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rps_middleware(
    State(state): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(req.headers(), peer, state.trust_forwarded);
    if !state.allow(&client) {
        tracing::warn!(client = %client, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "rate_limit_exceeded" })),
        )
            .into_response();
    }
    next.run(req).await
}

pub fn new_rps_state(rps: u32, trust_forwarded: bool) -> RateLimiter {
    RateLimiter::new(rps, trust_forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_each_client_separately() {
        let limiter = RateLimiter::new(2, false);
        let now = Instant::now();
        assert!(limiter.allow_at("10.0.0.1", now));
        assert!(limiter.allow_at("10.0.0.1", now));
        assert!(!limiter.allow_at("10.0.0.1", now));
        assert!(limiter.allow_at("10.0.0.2", now));
        assert!(limiter.allow_at("10.0.0.1", now + WINDOW));
    }

    #[test]
    fn forwarded_header_is_ignored_unless_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "41.90.1.2, 10.0.0.1".parse().unwrap());
        let peer: SocketAddr = "196.201.214.5:51234".parse().unwrap();

        assert_eq!(client_key(&headers, Some(peer), false), "196.201.214.5");
        assert_eq!(client_key(&headers, Some(peer), true), "41.90.1.2");
        assert_eq!(client_key(&HeaderMap::new(), Some(peer), true), "196.201.214.5");
        assert_eq!(client_key(&HeaderMap::new(), None, false), "unknown");
    }

    #[test]
    fn full_table_of_live_windows_turns_new_clients_away() {
        let limiter = RateLimiter::new(5, false);
        let now = Instant::now();
        for i in 0..MAX_TRACKED_CLIENTS {
            assert!(limiter.allow_at(&format!("c{}", i), now));
        }
        assert!(!limiter.allow_at("newcomer", now));
        // known clients keep their windows
        assert!(limiter.allow_at("c0", now));
        // once the windows lapse they are pruned and room frees up
        assert!(limiter.allow_at("newcomer", now + WINDOW));
        assert_eq!(limiter.windows.lock().unwrap().len(), 1);
    }
}
