use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;

use axum::body::HttpBody;
use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use tracing::{error, info};
use uuid::Uuid;

use super::guard::RequestGuard;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Placeholder for request attributes that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Response header echoing the id used in the request's log events.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps every request with timing, in-flight tracking, counting and
/// start/completion log events.
///
/// A panicking handler is turned into a 500 and still accounted for.
/// Any other response passes through untouched apart from the
/// `X-Request-Id` header.
pub async fn instrument_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let caller = caller_address(&request);
    let user_agent = header_str(request.headers(), header::USER_AGENT.as_str())
        .unwrap_or(UNKNOWN)
        .to_string();

    let guard = RequestGuard::start(
        state.metrics.clone(),
        request_id.clone(),
        method.clone(),
        endpoint.clone(),
    );
    info!(
        request_id = %request_id,
        method = %method,
        endpoint = %endpoint,
        path = %path,
        caller = %caller,
        user_agent = %user_agent,
        "request started"
    );

    let mut response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            error!(
                request_id = %request_id,
                "handler panicked: {}",
                panic_message(panic.as_ref())
            );
            HTTPError::internal().into_response()
        }
    };

    let bytes = response_size(&response);
    guard.finish(response.status().as_u16(), bytes);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Best-effort client address: first `X-Forwarded-For` hop, then the
/// socket peer, then [`UNKNOWN`].
fn caller_address(request: &Request) -> String {
    if let Some(forwarded) = header_str(request.headers(), "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Body size in bytes when known up front, else `Content-Length`, else 0.
fn response_size(response: &Response) -> u64 {
    response
        .body()
        .size_hint()
        .exact()
        .or_else(|| {
            header_str(response.headers(), header::CONTENT_LENGTH.as_str())
                .and_then(|len| len.parse().ok())
        })
        .unwrap_or(0)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::net::{IpAddr, Ipv4Addr};

    fn request() -> Request {
        axum::http::Request::builder()
            .uri("/tasks")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_caller_prefers_forwarded_for() {
        let mut req = request();
        req.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        req.extensions_mut().insert(ConnectInfo(SocketAddr::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            0,
        )));
        assert_eq!(caller_address(&req), "203.0.113.7");
    }

    #[test]
    fn test_caller_falls_back_to_peer_then_unknown() {
        let mut req = request();
        assert_eq!(caller_address(&req), UNKNOWN);

        req.extensions_mut().insert(ConnectInfo(SocketAddr::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            0,
        )));
        assert_eq!(caller_address(&req), "127.0.0.1");
    }

    #[test]
    fn test_response_size_uses_exact_body_length() {
        let response = Response::new(Body::from("hello"));
        assert_eq!(response_size(&response), 5);
    }

    #[test]
    fn test_panic_message_extracts_strings() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(owned.as_ref()), "bang");
    }
}
