//! 余额查询客户端测试
//!
//! 使用 wiremock 模拟 OpenRouter `/api/v1/credits` 接口，覆盖：
//! - 正常响应与缺省字段
//! - 非 2xx 状态码
//! - 响应体格式错误
//! - 超时

use openrouter_stats::StatsError;
use openrouter_stats::credits::{CreditSnapshot, CreditsClient, CreditsProvider};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "sk-or-test";

async fn credits_server(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/credits"))
        .and(header("authorization", "Bearer sk-or-test"))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_credits_success() {
    let server = credits_server(ResponseTemplate::new(200).set_body_json(json!({
        "data": {"total_credits": 50, "total_usage": 12.345_678_9}
    })))
    .await;

    let client = CreditsClient::with_base_url(&server.uri());
    let snapshot = client.fetch_credits(API_KEY, Uuid::new_v4()).await.unwrap();

    assert_eq!(snapshot, CreditSnapshot::new(50.0, 12.345_678_9));
    assert_eq!(format!("{:.7}", snapshot.remaining()), "37.6543211");
}

#[tokio::test]
async fn test_fetch_credits_missing_fields_default_to_zero() {
    let server =
        credits_server(ResponseTemplate::new(200).set_body_json(json!({"data": {"total_credits": 10}})))
            .await;

    let client = CreditsClient::with_base_url(&server.uri());
    let snapshot = client.fetch_credits(API_KEY, Uuid::new_v4()).await.unwrap();

    assert_eq!(snapshot, CreditSnapshot::new(10.0, 0.0));
}

#[tokio::test]
async fn test_fetch_credits_unauthorized() {
    let server = credits_server(
        ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "No auth credentials found"}})),
    )
    .await;

    let client = CreditsClient::with_base_url(&server.uri());
    let err = client.fetch_credits(API_KEY, Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, StatsError::UpstreamStatus { status: 401, .. }));
}

#[tokio::test]
async fn test_fetch_credits_malformed_body() {
    let server = credits_server(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let client = CreditsClient::with_base_url(&server.uri());
    let err = client.fetch_credits(API_KEY, Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, StatsError::Serialization { .. }));
}

#[tokio::test]
async fn test_fetch_credits_times_out() {
    let server = credits_server(
        ResponseTemplate::new(200)
            .set_body_json(json!({"data": {"total_credits": 1, "total_usage": 0}}))
            .set_delay(Duration::from_secs(7)),
    )
    .await;

    let client = CreditsClient::with_base_url(&server.uri());
    let started = std::time::Instant::now();
    let err = client.fetch_credits(API_KEY, Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, StatsError::Network { .. }));
    assert!(started.elapsed() < Duration::from_secs(7));
}
