//! End-to-end dispatch tests against mock backends.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use balancer::http::{echo, DispatchResult};
use reqwest::StatusCode;
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_unreachable_backend_leaves_rotation() {
    let up = common::start_mock_backend("a").await;
    let down = common::unreachable_addr().await;

    let mut config = common::config_for(&[up, down]);
    config.health_check.interval_secs = 3600;
    let balancer = common::start_balancer(config).await;

    // The first health tick fires as soon as the server starts.
    let pool = balancer.pool.clone();
    common::wait_until(move || pool.len() == 1).await;

    let client = common::client();
    for _ in 0..2 {
        let result: DispatchResult = client
            .get(balancer.url("/"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(result.server, up.to_string());
        assert_eq!(result.body, "a");
    }
}

#[tokio::test]
async fn test_all_backends_down_returns_503() {
    let mut config = common::config_for(&[
        common::unreachable_addr().await,
        common::unreachable_addr().await,
    ]);
    config.health_check.interval_secs = 3600;
    let balancer = common::start_balancer(config).await;

    let pool = balancer.pool.clone();
    common::wait_until(move || pool.is_empty()).await;

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.text().await.unwrap(), "No servers available");
}

#[tokio::test]
async fn test_result_reports_backend_and_timing() {
    let backend = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_millis(12)).await;
        (200, "ok".to_string())
    })
    .await;

    let mut config = common::config_for(&[backend]);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["server"], backend.to_string());
    assert_eq!(json["body"], "ok");

    let response_time = json["response_time"].as_f64().unwrap();
    assert!(response_time >= 0.012, "response_time {} too small", response_time);
    assert!(response_time < 1.0, "response_time {} too large", response_time);
}

#[tokio::test]
async fn test_round_robin_tags_rotation_slot() {
    let mut backends = Vec::new();
    for _ in 0..2 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        backends.push(listener.local_addr().unwrap());
        tokio::spawn(echo::serve(listener));
    }

    let mut config = common::config_for(&backends);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let client = common::client();
    let mut served = Vec::new();
    for _ in 0..4 {
        let result: DispatchResult = client
            .get(balancer.url("/"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        served.push((result.server, result.body));
    }

    let a = backends[0].to_string();
    let b = backends[1].to_string();
    assert_eq!(
        served,
        vec![
            (a.clone(), "Server 0 response".to_string()),
            (b.clone(), "Server 1 response".to_string()),
            (a, "Server 0 response".to_string()),
            (b, "Server 1 response".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_forward_failure_returns_500_without_eviction() {
    let mut config = common::config_for(&[common::unreachable_addr().await]);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Server error");

    assert_eq!(balancer.pool.len(), 1);
}

#[tokio::test]
async fn test_truncated_backend_body_returns_500() {
    let backend = common::start_raw_backend(
        "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nok",
    )
    .await;
    let mut config = common::config_for(&[backend]);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Server error");

    assert_eq!(balancer.pool.len(), 1);
}

#[tokio::test]
async fn test_oversized_backend_body_returns_500() {
    let backend = common::start_mock_backend("0123456789abcdef").await;
    let mut config = common::config_for(&[backend]);
    config.health_check.enabled = false;
    config.forward.max_body_bytes = 8;
    let balancer = common::start_balancer(config).await;

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Server error");
}

#[tokio::test]
async fn test_any_method_and_path_forwarded_as_get_root() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let backend = common::start_programmable_backend(move |request_line| {
        recorder.lock().unwrap().push(request_line);
        async { (200, "recorded".to_string()) }
    })
    .await;

    let mut config = common::config_for(&[backend]);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let client = common::client();
    let res = client
        .post(balancer.url("/some/path"))
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.delete(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            "GET /?server=0 HTTP/1.1".to_string(),
            "GET /?server=0 HTTP/1.1".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_backend_error_status_relayed_as_body() {
    let backend = common::start_programmable_backend(|_| async { (500, "boom".to_string()) }).await;

    let mut config = common::config_for(&[backend]);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let result: DispatchResult = res.json().await.unwrap();
    assert_eq!(result.body, "boom");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let backend = common::start_mock_backend("ok").await;
    let mut config = common::config_for(&[backend]);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let client = common::client();
    let res = client.get(balancer.url("/")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));

    let res = client
        .get(balancer.url("/"))
        .header("x-request-id", "fixed-id")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "fixed-id");
}

#[tokio::test]
async fn test_concurrent_requests_share_rotation_evenly() {
    let a = common::start_mock_backend("a").await;
    let b = common::start_mock_backend("b").await;

    let mut config = common::config_for(&[a, b]);
    config.health_check.enabled = false;
    let balancer = common::start_balancer(config).await;

    let client = common::client();
    let url = balancer.url("/");
    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let client = client.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let result: DispatchResult =
                    client.get(&url).send().await.unwrap().json().await.unwrap();
                result.body
            })
        })
        .collect();

    let mut a_hits = 0;
    let mut b_hits = 0;
    for task in tasks {
        match task.await.unwrap().as_str() {
            "a" => a_hits += 1,
            "b" => b_hits += 1,
            other => panic!("unexpected body {}", other),
        }
    }
    assert_eq!(a_hits, 10);
    assert_eq!(b_hits, 10);
}
