//! End-to-end request cycles: reducer → HTTP service (mocked) → reducer.

use std::sync::Arc;

use elizabeth::core::action::{Action, ERROR_REPLY, Effect, TurnRequest, update};
use elizabeth::core::config::ResolvedConfig;
use elizabeth::core::message::Sender;
use elizabeth::core::state::App;
use elizabeth::recommend::HttpRecommendationService;
use elizabeth::recommend::dispatch::resolve_turn;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn app_for(base_url: String) -> App {
    let config = ResolvedConfig {
        service_base_url: base_url.clone(),
        greeting: None,
        ..Default::default()
    };
    App::from_config(
        Arc::new(HttpRecommendationService::new(Some(base_url))),
        &config,
    )
}

fn expect_spawn(effect: Effect) -> TurnRequest {
    match effect {
        Effect::SpawnRequest(request) => request,
        other => panic!("expected SpawnRequest, got {:?}", other),
    }
}

/// Submits `draft`, performs the request and feeds the outcome back.
async fn run_turn(app: &mut App, draft: &str) {
    let request = expect_spawn(update(app, Action::Submit(draft.to_string())));
    assert!(app.is_waiting);
    let outcome = resolve_turn(app.service.as_ref(), &request).await;
    assert_eq!(update(app, outcome), Effect::None);
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_structured_reply_becomes_cards() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .and(body_json(json!({"query": "recommend something like Naruto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommendation": {
                "Bleach": {"id": "123", "image": "http://x/y.jpg", "description": "<p>Soul reapers.</p>"}
            }
        })))
        .mount(&mock_server)
        .await;

    let mut app = app_for(mock_server.uri());
    run_turn(&mut app, "recommend something like Naruto").await;

    assert!(!app.is_waiting);
    assert_eq!(app.store.len(), 2);
    let last = app.store.last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    let recs = last.recommendations().expect("structured reply");
    let bleach = recs.get("Bleach").expect("Bleach card");
    assert_eq!(
        bleach.catalog_link(&app.catalog_base_url).as_deref(),
        Some("https://anilist.co/anime/123")
    );
    assert_eq!(bleach.description, "Soul reapers.");
}

#[tokio::test]
async fn test_plain_reply_is_kept_verbatim() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"recommendation": "Hello, ask me about anime!"})),
        )
        .mount(&mock_server)
        .await;

    let mut app = app_for(mock_server.uri());
    run_turn(&mut app, "hi").await;

    assert_eq!(
        app.store.last().and_then(|m| m.text()),
        Some("Hello, ask me about anime!")
    );
}

#[tokio::test]
async fn test_failure_appends_apology_after_user_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut app = app_for(mock_server.uri());
    run_turn(&mut app, "hi").await;

    assert!(!app.is_waiting);
    let messages = app.store.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text(), Some("hi"));
    assert_eq!(messages[1].sender, Sender::Bot);
    assert_eq!(messages[1].text(), Some(ERROR_REPLY));
}

#[tokio::test]
async fn test_blank_draft_sends_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut app = app_for(mock_server.uri());
    assert_eq!(update(&mut app, Action::Submit("   ".into())), Effect::None);
    assert!(app.store.is_empty());
    assert!(!app.is_waiting);
}

#[tokio::test]
async fn test_conversation_history_accumulates() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"recommendation": "ok"})))
        .mount(&mock_server)
        .await;

    let mut app = app_for(mock_server.uri());
    run_turn(&mut app, "one").await;
    run_turn(&mut app, "one").await;

    let texts: Vec<_> = app.store.messages().iter().filter_map(|m| m.text()).collect();
    assert_eq!(texts, vec!["one", "ok", "one", "ok"]);
}
