#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, Response};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::Value;
use taskmon::config::{extract_config, ConfigV1};
use taskmon::routes::{create_router, ENDPOINTS};
use taskmon::state::AppState;

/// The four tasks the service ships with; task 3 is already done.
pub const SEEDED_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:5000
logging:
  level: "debug"
  format: "json"
tasks:
  seed:
    - title: "Buy milk"
    - title: "Write DevOps project documentation"
    - title: "Deploy app to AWS EC2"
      done: true
    - title: "Test GitHub Actions deployment"
"#;

pub const EMPTY_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:5000
"#;

pub fn load_test_config(yaml: &str) -> ConfigV1 {
    extract_config(Figment::new().merge(Yaml::string(yaml)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(config: ConfigV1) -> (Router, AppState) {
    let state = AppState::new(Arc::new(config), ENDPOINTS);
    (create_router(state.clone()), state)
}

pub fn request(method: Method, path: &str) -> Request<Body> {
    build_request(method, path, Body::empty())
}

pub fn json_request(method: Method, path: &str, body: &str) -> Request<Body> {
    let mut request = build_request(method, path, Body::from(body.to_string()));
    request
        .headers_mut()
        .insert("Content-Type", "application/json".parse().unwrap());
    request
}

/// A request with neither a peer address nor a user agent attached.
pub fn bare_request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

fn build_request(method: Method, path: &str, body: Body) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .body(body)
        .expect("failed to build request");

    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        0,
    )));

    request
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).expect("body is not JSON")
}
