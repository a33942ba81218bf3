//! E2E tests for multi-turn topology collection with a healthy engine.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestHarness, session_of};

/// Topology and count given in separate messages combine into one request.
#[tokio::test]
async fn e2e_topology_then_count() {
    let h = TestHarness::parse_mode().await;

    let (status, first) = h.chat("star topology", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["data"], json!({"topology": "star", "devices": null}));
    assert_eq!(first["create_topology"], false);

    let sid = session_of(&first);
    let (status, second) = h.chat("5 devices", Some(&sid)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"], json!({"topology": "star", "devices": 5}));
    assert_eq!(second["create_topology"], true);
}

/// Count first, topology second works the same way.
#[tokio::test]
async fn e2e_count_then_topology() {
    let h = TestHarness::parse_mode().await;

    let (_, first) = h.chat("I have 12 switches", None).await;
    assert_eq!(first["data"], json!({"topology": null, "devices": 12}));

    let (_, second) = h.chat("make it a ring", Some(&session_of(&first))).await;
    assert_eq!(second["data"], json!({"topology": "ring", "devices": 12}));
    assert_eq!(second["create_topology"], true);
}

/// Everything in one message is ready immediately.
#[tokio::test]
async fn e2e_single_message_complete() {
    let h = TestHarness::parse_mode().await;

    let (status, json) = h.chat("Build a MESH network with 8 devices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!({"topology": "mesh", "devices": 8}));
    assert_eq!(json["create_topology"], true);
}

/// After a topology is ready, the returned session starts empty and the
/// finished one is no longer held.
#[tokio::test]
async fn e2e_session_rotates_after_ready() {
    let h = TestHarness::parse_mode().await;

    let (_, partial) = h.chat("star please", None).await;
    let sid = session_of(&partial);
    assert_eq!(h.state.sessions().len().await, 1);

    let (_, ready) = h.chat("4 devices", Some(&sid)).await;
    assert_eq!(ready["create_topology"], true);
    let next = session_of(&ready);
    assert_ne!(next, sid);
    assert!(h.state.sessions().is_empty().await);

    let (_, after) = h.chat("what now?", Some(&next)).await;
    assert_eq!(after["data"], json!({"topology": null, "devices": null}));
    assert_eq!(after["create_topology"], false);
    assert!(h.state.sessions().is_empty().await);
}

/// Chatter without a token or any field leaves no sessions behind.
#[tokio::test]
async fn e2e_tokenless_small_talk_stores_nothing() {
    let h = TestHarness::parse_mode().await;
    for text in ["hi", "how does this work?", "thanks"] {
        let (status, json) = h.chat(text, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["session_id"].is_string());
    }
    assert!(h.state.sessions().is_empty().await);
}

/// Re-using a retired session id does not resurrect its fields.
#[tokio::test]
async fn e2e_retired_session_id_starts_fresh() {
    let h = TestHarness::parse_mode().await;

    let (_, partial) = h.chat("bus topology", None).await;
    let sid = session_of(&partial);
    let (_, ready) = h.chat("3 devices", Some(&sid)).await;
    assert_eq!(ready["create_topology"], true);

    let (_, stale) = h.chat("hello", Some(&sid)).await;
    assert_ne!(session_of(&stale), sid);
    assert!(stale["data"]["topology"].is_null());
}

/// Later values overwrite earlier ones within a session.
#[tokio::test]
async fn e2e_later_topology_overwrites() {
    let h = TestHarness::parse_mode().await;

    let (_, first) = h.chat("star please", None).await;
    let sid = session_of(&first);
    let (_, second) = h.chat("actually a tree", Some(&sid)).await;
    assert_eq!(second["data"]["topology"], "tree");
    assert_eq!(second["create_topology"], false);
}

/// Without an engine reply, the default acknowledgement is used.
#[tokio::test]
async fn e2e_default_message_in_parse_mode() {
    let h = TestHarness::parse_mode().await;
    let (_, json) = h.chat("ring", None).await;
    assert_eq!(json["message"], "Message received.");
}

/// Health reports the loaded model in parse mode.
#[tokio::test]
async fn e2e_health_parse_mode() {
    let h = TestHarness::parse_mode().await;
    let (status, json) = h.health().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "healthy", "model_loaded": true}));
}
