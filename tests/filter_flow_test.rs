//! 打标到上报的完整流程测试

use openrouter_stats::credits::CreditsClient;
use openrouter_stats::status::{ChannelEmitter, StatusEvent};
use openrouter_stats::{FilterConfig, ModelDescriptor, StatsFilter};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn response_envelope() -> Value {
    json!({
        "model": "acme/model-x",
        "messages": [
            {"role": "user", "content": "hello"},
            {"role": "assistant", "content": "hi!", "usage": {"total_tokens": 100, "cost": 0.000_123_4}}
        ]
    })
}

fn config(api_key: &str) -> FilterConfig {
    FilterConfig {
        openrouter_api_key: api_key.to_string(),
        show_elapsed_time: false,
        show_tokens_per_sec: false,
        ..FilterConfig::default()
    }
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<StatusEvent>) -> Vec<StatusEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_tag_then_report_with_balance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"total_credits": 50, "total_usage": 12.345_678_9}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = StatsFilter::with_credits_provider(
        config("sk-or-test"),
        Arc::new(CreditsClient::with_base_url(&server.uri())),
    );

    let model = ModelDescriptor::new("acme/model-x", Some(json!({"context_length": 8192})));
    let (request, turn) = filter.tag(json!({"model": "acme/model-x", "messages": []}), Some(&model));
    assert_eq!(request["usage"], json!({"include": true}));
    assert!(turn.detailed_usage);

    let (emitter, mut rx) = ChannelEmitter::channel();
    let returned = filter
        .report(response_envelope(), Some(&turn), Some(&emitter))
        .await;
    assert_eq!(returned, response_envelope());

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            StatusEvent::in_progress("Computing total costs..."),
            StatusEvent::done("🪙 100 Tokens | 💸 $0.0001234 | 💰 $37.6543211 of $50.00"),
        ]
    );
}

#[tokio::test]
async fn test_unauthorized_lookup_still_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/credits"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let filter = StatsFilter::with_credits_provider(
        config("sk-or-bad"),
        Arc::new(CreditsClient::with_base_url(&server.uri())),
    );

    let (_, turn) = filter.tag(json!({}), None);
    let (emitter, mut rx) = ChannelEmitter::channel();
    filter
        .report(response_envelope(), Some(&turn), Some(&emitter))
        .await;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    let last = &events[1];
    assert!(last.is_done());
    assert_eq!(last.description(), "🪙 100 Tokens | 💸 $0.0001234");
    assert!(!last.description().contains("💰"));
}

#[tokio::test]
async fn test_all_toggles_off_emits_empty_status() {
    let filter = StatsFilter::new(FilterConfig {
        openrouter_api_key: String::new(),
        show_total_tokens: false,
        show_elapsed_time: false,
        show_tokens_per_sec: false,
        show_base_credits: false,
        show_emojis: false,
    });

    let (_, turn) = filter.tag(json!({}), None);
    let (emitter, mut rx) = ChannelEmitter::channel();
    let envelope = json!({"messages": [{"usage": {"total_tokens": 100, "cost": 0}}]});
    filter.report(envelope, Some(&turn), Some(&emitter)).await;

    let events = drain(&mut rx);
    assert_eq!(events.last(), Some(&StatusEvent::done("")));
}

#[tokio::test]
async fn test_one_filter_serves_concurrent_turns() {
    let filter = Arc::new(StatsFilter::new(FilterConfig {
        show_emojis: false,
        show_elapsed_time: false,
        show_tokens_per_sec: false,
        ..FilterConfig::default()
    }));

    let mut handles = Vec::new();
    for tokens in [10_u64, 20, 30] {
        let filter = Arc::clone(&filter);
        handles.push(tokio::spawn(async move {
            let (_, turn) = filter.tag(json!({}), None);
            let (emitter, mut rx) = ChannelEmitter::channel();
            let envelope = json!({"messages": [{"usage": {"total_tokens": tokens}}]});
            filter.report(envelope, Some(&turn), Some(&emitter)).await;
            let mut last = None;
            while let Ok(event) = rx.try_recv() {
                last = Some(event);
            }
            (tokens, last)
        }));
    }

    for handle in handles {
        let (tokens, last) = handle.await.unwrap();
        assert_eq!(last, Some(StatusEvent::done(format!("{tokens} Tokens"))));
    }
}
