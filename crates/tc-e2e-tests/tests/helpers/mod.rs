//! Shared test harness for E2E integration tests.
//!
//! Runs the real chat router against a wiremock dialogue engine that
//! behaves like a small NLU model: it recognizes topology words as
//! entities but never fills the device count, so counts always come from
//! the text fallback.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

use tc_chat_api::config::{DialogueConfig, DialogueMode};
use tc_chat_api::dialogue::build_engine;
use tc_chat_api::routes::build_router;
use tc_chat_api::state::AppState;

/// Topology labels the fake model knows.
const TOPOLOGIES: &[&str] = &["star", "mesh", "ring", "bus", "tree"];

fn topology_in(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    TOPOLOGIES.iter().copied().find(|t| lower.contains(t))
}

fn first_number(text: &str) -> Option<String> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// `/model/parse`: topology entity only.
struct FakeParse;

impl Respond for FakeParse {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let text = body["text"].as_str().unwrap_or_default();
        let entities: Vec<Value> = topology_in(text)
            .map(|t| json!({"entity": "topology", "value": t.to_uppercase()}))
            .into_iter()
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({
            "text": text,
            "intent": {"name": "create_topology", "confidence": 0.9},
            "entities": entities,
        }))
    }
}

/// Per-sender slot memory for the tracker engine.
#[derive(Clone, Default)]
struct Slots(Arc<Mutex<HashMap<String, (Option<String>, Option<String>)>>>);

/// `/webhooks/rest/webhook`: fills slots (count included) and replies.
struct FakeWebhook(Slots);

impl Respond for FakeWebhook {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let sender = body["sender"].as_str().unwrap_or_default().to_string();
        let text = body["message"].as_str().unwrap_or_default();

        let mut slots = self.0.0.lock().unwrap();
        let entry = slots.entry(sender.clone()).or_default();
        if let Some(t) = topology_in(text) {
            entry.0 = Some(t.to_string());
        }
        if let Some(n) = first_number(text) {
            entry.1 = Some(n);
        }

        let reply = match entry {
            (Some(t), Some(n)) => format!("Creating a {t} topology with {n} devices."),
            (Some(_), None) => "How many devices?".to_string(),
            _ => "Which topology would you like?".to_string(),
        };
        ResponseTemplate::new(200).set_body_json(json!([{"recipient_id": sender, "text": reply}]))
    }
}

/// `/conversations/{sender}/tracker`: the sender's slots.
struct FakeTracker(Slots);

impl Respond for FakeTracker {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let sender = request
            .url
            .path()
            .trim_start_matches("/conversations/")
            .trim_end_matches("/tracker")
            .to_string();
        let slots = self.0.0.lock().unwrap();
        let (topology, count) = slots.get(&sender).cloned().unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(json!({
            "sender_id": sender,
            "slots": {"topology": topology, "device_count": count},
        }))
    }
}

/// End-to-end harness: chat router + optional mock dialogue engine.
pub struct TestHarness {
    pub state: AppState,
    pub router: Router,
    /// Mock engine (None when running offline).
    pub engine: Option<MockServer>,
}

impl TestHarness {
    /// Parse strategy against a healthy fake NLU model.
    pub async fn parse_mode() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/model/parse"))
            .respond_with(FakeParse)
            .mount(&server)
            .await;
        mount_status(&server, json!({"model_file": "models/20240101-000000.tar.gz"})).await;
        Self::with_engine(server, DialogueMode::Parse).await
    }

    /// Tracker strategy against a fake engine with per-sender slots.
    pub async fn tracker_mode() -> Self {
        let server = MockServer::start().await;
        let slots = Slots::default();
        Mock::given(method("POST"))
            .and(path("/webhooks/rest/webhook"))
            .respond_with(FakeWebhook(slots.clone()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/conversations/[^/]+/tracker$"))
            .respond_with(FakeTracker(slots))
            .mount(&server)
            .await;
        mount_status(&server, json!({"num_active_training_jobs": 0})).await;
        Self::with_engine(server, DialogueMode::Tracker).await
    }

    /// Engine that answers every request with `status`.
    pub async fn failing_engine(mode: DialogueMode, status: u16) -> Self {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        Self::with_engine(server, mode).await
    }

    /// Engine configured at an address where nothing listens.
    pub async fn unreachable_engine(mode: DialogueMode) -> Self {
        let server = MockServer::start().await;
        let url = server.uri();
        drop(server);
        Self::from_config(DialogueConfig {
            mode,
            url,
            timeout_secs: 1,
            generate_reply: false,
        })
    }

    /// No dialogue engine at all.
    pub fn offline() -> Self {
        Self::from_config(DialogueConfig {
            mode: DialogueMode::Disabled,
            ..DialogueConfig::default()
        })
    }

    async fn with_engine(server: MockServer, mode: DialogueMode) -> Self {
        let mut harness = Self::from_config(DialogueConfig {
            mode,
            url: server.uri(),
            timeout_secs: 2,
            generate_reply: false,
        });
        harness.engine = Some(server);
        harness
    }

    fn from_config(config: DialogueConfig) -> Self {
        let state = AppState::new(build_engine(&config).unwrap());
        let router = build_router(state.clone());
        Self {
            state,
            router,
            engine: None,
        }
    }

    /// POST /chat with a message and optional session id.
    pub async fn chat(&self, message: &str, session_id: Option<&str>) -> (StatusCode, Value) {
        chat(&self.router, message, session_id).await
    }

    /// POST /chat with a raw body.
    pub async fn post_chat(&self, body: Body) -> (StatusCode, Value) {
        post_chat(&self.router, body).await
    }

    /// GET /health.
    pub async fn health(&self) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// POST /chat through `router`; usable from spawned tasks.
pub async fn chat(
    router: &Router,
    message: &str,
    session_id: Option<&str>,
) -> (StatusCode, Value) {
    let mut body = json!({ "message": message });
    if let Some(sid) = session_id {
        body["session_id"] = json!(sid);
    }
    post_chat(router, Body::from(serde_json::to_vec(&body).unwrap())).await
}

async fn post_chat(router: &Router, body: Body) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post("/chat")
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn mount_status(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Session id from a chat response body.
pub fn session_of(json: &Value) -> String {
    json["session_id"]
        .as_str()
        .expect("response should carry a session_id")
        .to_string()
}
