mod common;

use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{middleware, Router};
use serde_json::json;
use tower::ServiceExt;

use common::{
    body_json, body_text, build_app, json_request, load_test_config, request, EMPTY_CONFIG,
    SEEDED_CONFIG,
};
use taskmon::health::VERSION;
use taskmon::instrumentation::{instrument_request, REQUEST_ID_HEADER};
use taskmon::routes::ENDPOINTS;

/// Value of an unlabeled sample such as `tasks_total 4`.
fn sample(metrics: &str, name: &str) -> Option<f64> {
    metrics.lines().find_map(|line| {
        let (metric, value) = line.split_once(' ')?;
        (metric == name).then(|| value.trim().parse().ok()).flatten()
    })
}

#[tokio::test]
async fn integration_health_reports_ok() {
    let (app, _state) = build_app(load_test_config(SEEDED_CONFIG));

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/health"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["version"], json!(VERSION));
    assert_eq!(body["checks"]["task_store"], json!("ok"));
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn integration_status_matches_task_list() {
    let (app, _state) = build_app(load_test_config(SEEDED_CONFIG));

    app.clone()
        .oneshot(json_request(Method::POST, "/tasks", r#"{"title": "X"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(request(Method::PUT, "/tasks/1/toggle"))
        .await
        .unwrap();
    app.clone()
        .oneshot(request(Method::DELETE, "/tasks/3"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/tasks"))
        .await
        .unwrap();
    let tasks = body_json(response).await;
    let total = tasks.as_array().unwrap().len() as u64;

    let metrics = &status["metrics"];
    assert_eq!(status["status"], json!("running"));
    assert_eq!(metrics["total_tasks"].as_u64(), Some(total));
    assert_eq!(metrics["completed_tasks"].as_u64(), Some(1));
    assert_eq!(
        metrics["completed_tasks"].as_u64().unwrap() + metrics["pending_tasks"].as_u64().unwrap(),
        total
    );
    assert_eq!(status["endpoints"], json!(ENDPOINTS));
}

#[tokio::test]
async fn integration_metrics_exposition() {
    let (app, _state) = build_app(load_test_config(SEEDED_CONFIG));

    app.clone()
        .oneshot(request(Method::GET, "/tasks"))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request(Method::POST, "/tasks", "{}"))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request(Method::POST, "/tasks", r#"{"title": "new"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(request(Method::PUT, "/tasks/2/toggle"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("text/plain"));

    let text = body_text(response).await;
    assert!(text.contains(
        "http_requests_total{endpoint=\"/tasks\",method=\"GET\",status=\"200\"} 1"
    ));
    assert!(text.contains(
        "http_requests_total{endpoint=\"/tasks\",method=\"POST\",status=\"400\"} 1"
    ));
    assert!(text.contains(
        "http_requests_total{endpoint=\"/tasks\",method=\"POST\",status=\"201\"} 1"
    ));
    assert!(text.contains(
        "http_requests_total{endpoint=\"/tasks/{id}/toggle\",method=\"PUT\",status=\"200\"} 1"
    ));
    assert!(text.contains("http_request_duration_seconds_bucket"));
    assert_eq!(sample(&text, "tasks_total"), Some(5.0));
    assert_eq!(sample(&text, "tasks_completed"), Some(2.0));
    // The scrape itself is still in flight while the body is rendered.
    assert_eq!(sample(&text, "http_requests_in_flight"), Some(1.0));
}

#[tokio::test]
async fn integration_task_gauges_primed_at_startup() {
    let (app, _state) = build_app(load_test_config(SEEDED_CONFIG));

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/metrics"))
        .await
        .unwrap();
    let text = body_text(response).await;
    assert_eq!(sample(&text, "tasks_total"), Some(4.0));
    assert_eq!(sample(&text, "tasks_completed"), Some(1.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn integration_task_gauges_match_store_after_concurrent_mutations() {
    let (app, _state) = build_app(load_test_config(SEEDED_CONFIG));

    let handles: Vec<_> = (0..48)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let req = if i % 3 == 0 {
                    request(Method::PUT, &format!("/tasks/{}/toggle", 1 + i % 4))
                } else {
                    json_request(
                        Method::POST,
                        "/tasks",
                        &json!({ "title": format!("load {}", i) }).to_string(),
                    )
                };
                app.oneshot(req).await.unwrap().status()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/status"))
        .await
        .unwrap();
    let counts = body_json(response).await["metrics"].clone();

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/metrics"))
        .await
        .unwrap();
    let text = body_text(response).await;
    assert_eq!(
        sample(&text, "tasks_total"),
        counts["total_tasks"].as_f64()
    );
    assert_eq!(
        sample(&text, "tasks_completed"),
        counts["completed_tasks"].as_f64()
    );
    assert_eq!(sample(&text, "tasks_total"), Some(36.0));
}

#[tokio::test]
async fn integration_active_requests_balance() {
    let (app, state) = build_app(load_test_config(EMPTY_CONFIG));

    for (method, path) in [
        (Method::GET, "/health"),
        (Method::GET, "/tasks"),
        (Method::DELETE, "/tasks/7"),
        (Method::GET, "/missing"),
    ] {
        app.clone().oneshot(request(method, path)).await.unwrap();
    }

    assert_eq!(state.metrics.active_requests(), 0);
    assert_eq!(state.metrics.request_count("DELETE", "/tasks/{id}", 404), 1);
}

#[tokio::test]
async fn integration_request_id_header_is_set() {
    let (app, _state) = build_app(load_test_config(EMPTY_CONFIG));

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/health"))
        .await
        .unwrap();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("X-Request-Id header missing")
        .to_str()
        .unwrap();
    assert_eq!(request_id.len(), 36);
}

async fn exploding_handler() -> StatusCode {
    panic!("handler exploded");
}

#[tokio::test]
async fn integration_panicking_handler_becomes_500() {
    let (_app, state) = build_app(load_test_config(EMPTY_CONFIG));
    let app = Router::new()
        .route("/explode", get(exploding_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            instrument_request,
        ))
        .with_state(state.clone());

    let response = app
        .oneshot(request(Method::GET, "/explode"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal server error"})
    );

    assert_eq!(state.metrics.active_requests(), 0);
    assert_eq!(state.metrics.request_count("GET", "/explode", 500), 1);
}
