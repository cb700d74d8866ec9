//! End-to-end tests: client → dispatcher → HTTP ingestion against a mock API.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use langfuse::api::{ApiClient, ApiError};
use langfuse::model::{GetPromptRequest, Prompt, Span, Trace};
use langfuse::observer::{DeliveryError, ErrorSink, FlushOutcome};
use langfuse::{Langfuse, LangfuseConfig, LangfuseError};

mod common;

const ACCEPTED: &str = r#"{"successes":[],"errors":[]}"#;

fn config_for(addr: SocketAddr) -> LangfuseConfig {
    let mut config = LangfuseConfig::default();
    config.api.host = format!("http://{}", addr);
    config.api.public_key = "pk-lf-test".into();
    config.api.secret_key = "sk-lf-test".into();
    // Only explicit flushes deliver, so tests control batch boundaries.
    config.flush_interval_ms = 0;
    config
}

fn batch_len(request: &common::CapturedRequest) -> usize {
    request.json()["batch"].as_array().map(Vec::len).unwrap_or(0)
}

#[derive(Default)]
struct CountingSink {
    failures: AtomicUsize,
    events: AtomicUsize,
}

impl ErrorSink for CountingSink {
    fn record_failure(&self, _error: &DeliveryError, batch_size: usize) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        self.events.fetch_add(batch_size, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_flush_posts_batch_with_basic_auth() {
    let (addr, captured) = common::start_mock_backend(207, ACCEPTED).await;
    let langfuse = Langfuse::new(config_for(addr)).unwrap();

    let trace = langfuse.trace(Trace {
        name: Some("chat-turn".into()),
        user_id: Some("user-1".into()),
        ..Default::default()
    });
    let span = langfuse.span(
        Span {
            trace_id: trace.id.clone(),
            name: Some("retrieve".into()),
            ..Default::default()
        },
        None,
    );
    langfuse.span_end(span).unwrap();

    let outcome = langfuse.flush_timeout(Duration::from_secs(5)).await;
    assert_eq!(outcome, FlushOutcome::Drained);
    assert_eq!(langfuse.pending(), 0);

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/public/ingestion");
    assert_eq!(
        request.authorization.as_deref(),
        Some("Basic cGstbGYtdGVzdDpzay1sZi10ZXN0")
    );

    let body = request.json();
    let batch = body["batch"].as_array().unwrap();
    let types: Vec<_> = batch.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["trace-create", "span-create", "span-update"]);
    assert_eq!(batch[0]["body"]["id"], trace.id.as_str());
    assert_eq!(batch[0]["body"]["userId"], "user-1");
    assert_eq!(batch[1]["body"]["traceId"], trace.id.as_str());
    assert!(batch.iter().all(|e| e["timestamp"].is_string()));
}

#[tokio::test]
async fn test_rejected_batch_is_reported_and_dropped() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let (addr, captured) = common::start_programmable_backend(move |_| {
        let c = c.clone();
        async move {
            if c.fetch_add(1, Ordering::SeqCst) == 0 {
                (500, r#"{"message":"boom"}"#.to_string())
            } else {
                (207, ACCEPTED.to_string())
            }
        }
    })
    .await;

    let config = config_for(addr);
    let sink = Arc::new(CountingSink::default());
    let api = ApiClient::new(config.api.clone()).unwrap();
    let langfuse = Langfuse::with_error_sink(config, api, sink.clone()).unwrap();

    langfuse.trace(Trace::named("first"));
    langfuse.trace(Trace::named("second"));
    assert_eq!(langfuse.flush_timeout(Duration::from_secs(5)).await, FlushOutcome::Drained);
    assert_eq!(sink.failures.load(Ordering::SeqCst), 1);
    assert_eq!(sink.events.load(Ordering::SeqCst), 2);

    // Nothing left to send: the failed batch is not retried.
    assert_eq!(langfuse.flush_timeout(Duration::from_secs(5)).await, FlushOutcome::Drained);
    assert_eq!(captured.lock().unwrap().len(), 1);

    langfuse.trace(Trace::named("third"));
    assert_eq!(langfuse.flush_timeout(Duration::from_secs(5)).await, FlushOutcome::Drained);

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(batch_len(&requests[1]), 1);
    assert_eq!(sink.failures.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_deliver_exactly_once() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 50;

    let (addr, captured) = common::start_mock_backend(207, ACCEPTED).await;
    let langfuse = Arc::new(Langfuse::new(config_for(addr)).unwrap());

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let langfuse = langfuse.clone();
            tokio::spawn(async move {
                for i in 0..PER_PRODUCER {
                    langfuse.trace(Trace::named(format!("p{}-{}", p, i)));
                    if i % 10 == 0 {
                        langfuse.observer().flush();
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }

    assert_eq!(langfuse.flush_timeout(Duration::from_secs(10)).await, FlushOutcome::Drained);

    let requests = captured.lock().unwrap().clone();
    let names: Vec<String> = requests
        .iter()
        .flat_map(|r| {
            r.json()["batch"]
                .as_array()
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|e| e["body"]["name"].as_str().unwrap().to_string())
        })
        .collect();

    assert_eq!(names.len(), PRODUCERS * PER_PRODUCER);
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len(), "an event was delivered twice");
}

#[tokio::test]
async fn test_tick_delivers_without_explicit_flush() {
    let (addr, captured) = common::start_mock_backend(207, ACCEPTED).await;
    let mut config = config_for(addr);
    config.flush_interval_ms = 50;
    let langfuse = Langfuse::new(config).unwrap();

    langfuse.trace(Trace::named("ticked"));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while captured.lock().unwrap().is_empty() {
        assert!(tokio::time::Instant::now() < deadline, "tick never delivered");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(batch_len(&captured.lock().unwrap()[0]), 1);
}

#[tokio::test]
async fn test_shutdown_delivers_remaining_events() {
    let (addr, captured) = common::start_mock_backend(207, ACCEPTED).await;
    let langfuse = Langfuse::new(config_for(addr)).unwrap();

    langfuse.trace(Trace::named("last words"));
    assert_eq!(langfuse.shutdown(Duration::from_secs(5)).await, FlushOutcome::Drained);

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(batch_len(&requests[0]), 1);
}

#[tokio::test]
async fn test_get_prompt_text_and_chat() {
    let (addr, captured) = common::start_programmable_backend(|req| async move {
        if req.path.starts_with("/api/public/v2/prompts/greeting") {
            (
                200,
                r#"{"type":"text","name":"greeting","version":2,"prompt":"Hi {{name}}","labels":["production"]}"#
                    .to_string(),
            )
        } else if req.path.starts_with("/api/public/v2/prompts/assistant") {
            (
                200,
                r#"{"type":"chat","name":"assistant","version":1,"prompt":[{"role":"system","content":"Be brief."}]}"#
                    .to_string(),
            )
        } else {
            (404, r#"{"error":"Prompt not found"}"#.to_string())
        }
    })
    .await;
    let langfuse = Langfuse::new(config_for(addr)).unwrap();

    let mut req = GetPromptRequest::new("greeting");
    req.label = Some("production".into());
    let prompt = langfuse.get_prompt(&req).await.unwrap();
    assert!(matches!(&prompt, Prompt::Text(p) if p.prompt == "Hi {{name}}"));
    assert_eq!(prompt.version(), 2);

    let mut req = GetPromptRequest::new("assistant");
    req.version = Some(1);
    let prompt = langfuse.get_prompt(&req).await.unwrap();
    assert!(matches!(&prompt, Prompt::Chat(p) if p.prompt[0].content == "Be brief."));

    let err = langfuse
        .get_prompt(&GetPromptRequest::new("missing"))
        .await
        .unwrap_err();
    match err {
        LangfuseError::Api(ApiError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "Prompt not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let paths: Vec<String> = captured.lock().unwrap().iter().map(|r| r.path.clone()).collect();
    assert!(paths.contains(&"/api/public/v2/prompts/greeting?label=production".to_string()));
    assert!(paths.contains(&"/api/public/v2/prompts/assistant?version=1".to_string()));
}
