//! Request middleware stack.
//!
//! Outermost first: request id -> request log -> panic recovery -> CORS ->
//! timeout -> handler. The log sees the final status, including recovered
//! panics and timeouts.

use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    body::HttpBody,
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use fizzbuzz_core::error::FizzBuzzError;

use crate::app_state::AppState;
use crate::config::CorsSection;
use crate::http::{response::internal_error, ApiError};

const ALLOW_METHODS: &str = "GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, X-Request-Id";

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const MAX_REQUEST_ID_LEN: usize = 128;

/// Per-request correlation id, stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Reuse the caller's `x-request-id` when it is sane, otherwise mint one.
/// The id is echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let value = HeaderValue::from_str(&id).ok();
    req.extensions_mut().insert(RequestId(id));

    let mut resp = next.run(req).await;
    if let Some(v) = value {
        resp.headers_mut().insert(REQUEST_ID_HEADER, v);
    }
    resp
}

/// Structured access log + request metrics.
pub async fn request_log(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|RequestId(id)| id.clone())
        .unwrap_or_default();

    let resp = next.run(req).await;

    let elapsed = start.elapsed();
    let status = resp.status().as_u16();
    let bytes = resp.body().size_hint().exact();
    let duration_ms = elapsed.as_secs_f64() * 1000.0;

    let status_label = status.to_string();
    let m = app.metrics();
    m.http_requests.inc(&[("route", route.as_str()), ("status", status_label.as_str())]);
    m.request_duration.observe(&[("route", route.as_str())], elapsed);

    macro_rules! log_at {
        ($lvl:ident) => {
            tracing::$lvl!(
                %method,
                %path,
                status,
                duration_ms,
                bytes,
                %remote_addr,
                %user_agent,
                %request_id,
                "http request"
            )
        };
    }
    match status {
        s if s >= 500 => log_at!(error),
        s if s >= 400 => log_at!(warn),
        _ => log_at!(info),
    }

    resp
}

/// Convert a handler panic into a JSON 500.
pub async fn catch_panic(State(app): State<AppState>, req: Request, next: Next) -> Response {
    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(resp) => resp,
        Err(panic) => {
            app.metrics().panics.inc(&[]);
            tracing::error!(panic = %panic_message(panic.as_ref()), "handler panicked");
            internal_error()
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// Abort requests that run longer than `server.request_timeout_ms`.
pub async fn timeout(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let limit = app.cfg().server.request_timeout();
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(resp) => resp,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "request timed out");
            ApiError::from(FizzBuzzError::Timeout).into_response()
        }
    }
}

/// Origin-based CORS with preflight handling.
pub async fn cors(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let cors = &app.cfg().cors;
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if req.method() == Method::OPTIONS && origin.is_some() {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        apply_cors(resp.headers_mut(), cors, origin.as_deref());
        let h = resp.headers_mut();
        h.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        h.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
        return resp;
    }

    let mut resp = next.run(req).await;
    apply_cors(resp.headers_mut(), cors, origin.as_deref());
    resp
}

fn apply_cors(headers: &mut HeaderMap, cors: &CorsSection, origin: Option<&str>) {
    if cors.allows_any() {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        return;
    }
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    if let Some(origin) = origin.filter(|o| cors.allows(o)) {
        if let Ok(v) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(origins: &[&str]) -> CorsSection {
        CorsSection {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn wildcard_allows_everyone() {
        let mut h = HeaderMap::new();
        apply_cors(&mut h, &section(&["*"]), Some("https://a.example"));
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn listed_origin_is_echoed() {
        let mut h = HeaderMap::new();
        apply_cors(&mut h, &section(&["https://a.example"]), Some("https://a.example"));
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://a.example");
        assert_eq!(h[header::VARY], "Origin");
    }

    #[test]
    fn unlisted_origin_gets_no_allow_header() {
        let mut h = HeaderMap::new();
        apply_cors(&mut h, &section(&["https://a.example"]), Some("https://evil.example"));
        assert!(h.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[test]
    fn panic_payloads() {
        let s: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(s.as_ref()), "boom");
        let s: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(s.as_ref()), "kaboom");
        let s: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(s.as_ref()), "unknown panic");
    }
}
