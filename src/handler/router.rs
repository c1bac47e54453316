//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the root
//! redirect, health probes, the landing page and the static fallback.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderMap, HeaderValue, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, CachePolicy};
use crate::logger::{self, AccessLogEntry};
use crate::site::{ROOT_REDIRECT, WEEKLY_REPORTS};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub range_header: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    fn from_parts(parts: &'a Parts) -> Self {
        Self {
            path: parts.uri.path(),
            is_head: parts.method == Method::HEAD,
            if_none_match: header_str(&parts.headers, "if-none-match"),
            range_header: header_str(&parts.headers, "range"),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
///
/// Only the request head is inspected; the body is dropped unread, so any
/// body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let mut response = route_request(&parts, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.access_log {
        log_access(&parts, &response, peer_addr, started, &state);
    }

    Ok(response)
}

/// Route request based on method, path and configuration
async fn route_request(parts: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    let config = &state.config;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&parts.method, config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(&parts.headers, config.http.max_body_size) {
        return resp;
    }

    logger::log_headers_count(parts.headers.len(), config.logging.show_headers);

    let ctx = RequestContext::from_parts(parts);

    // 3. Root redirect, evaluated before any page
    if ROOT_REDIRECT.applies_to(ctx.path) {
        return http::build_redirect_response(ROOT_REDIRECT.destination_path, ROOT_REDIRECT.status());
    }

    // 4. Health check endpoints
    let health = &config.routes.health;
    if health.enabled {
        if ctx.path == health.liveness_path {
            return http::build_health_response("ok");
        }
        if ctx.path == health.readiness_path {
            return http::build_json_response(&serde_json::json!({
                "status": "ready",
                "reports": WEEKLY_REPORTS.len(),
            }));
        }
    }

    // 5. Landing page
    if ctx.path == config.site.landing_path {
        return serve_landing_page(&ctx, state);
    }

    // 6. Static assets, when co-located with the portal
    if let Some(root) = config.site.static_root.as_deref() {
        return static_files::serve_directory(&ctx, root, &config.routes.index_files).await;
    }

    http::build_404_response()
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size_str = header_str(headers, "content-length")?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Serve the pre-rendered landing page
fn serve_landing_page(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let page = &state.landing_page;

    if crate::http::cache::check_etag_match(ctx.if_none_match, &page.etag) {
        return http::build_304_response(&page.etag, CachePolicy::NoCache);
    }

    http::response::build_cached_response(
        page.html.clone(),
        "text/html; charset=utf-8",
        &page.etag,
        CachePolicy::NoCache,
        ctx.is_head,
    )
}

fn log_access(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", parts.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_str(&parts.headers, "referer").map(ToString::to_string);
    entry.user_agent = header_str(&parts.headers, "user-agent").map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}
