//! Conversation sessions — partial topology requests accumulated across turns.
//!
//! Each session is owned by its key in the `SessionStore` and guarded by its
//! own mutex, so turns on one conversation are serialized while other
//! conversations proceed. A session is only stored once a turn has given it
//! a field; turns that extract nothing leave no entry behind. A session is
//! retired as soon as both fields are known; the caller continues with the
//! fresh id handed back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tc_protocol::ExtractedEntities;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time;
use uuid::Uuid;

/// Where a session stands in collecting the two required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    TopologyOnly,
    DevicesOnly,
    Complete,
}

/// Accumulated state for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSession {
    /// Opaque token; also the sender id for the dialogue engine.
    pub id: String,
    pub topology: Option<String>,
    pub devices: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once the session has been completed or reaped.
    retired: bool,
}

impl ConversationSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            topology: None,
            devices: None,
            created_at: now,
            updated_at: now,
            retired: false,
        }
    }

    /// Overlay a turn's extraction: new values win, absent values keep the old.
    pub fn merge(&self, extracted: &ExtractedEntities) -> Self {
        Self {
            topology: extracted.topology.clone().or_else(|| self.topology.clone()),
            devices: extracted.devices.or(self.devices),
            ..self.clone()
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.topology, self.devices) {
            (None, None) => SessionState::Empty,
            (Some(_), None) => SessionState::TopologyOnly,
            (None, Some(_)) => SessionState::DevicesOnly,
            (Some(_), Some(_)) => SessionState::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    /// Snapshot of the two fields for the response body.
    pub fn data(&self) -> ExtractedEntities {
        ExtractedEntities {
            topology: self.topology.clone(),
            devices: self.devices,
        }
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

type SessionHandle = Arc<Mutex<ConversationSession>>;

/// In-memory session map keyed by session id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session for `key` for the duration of a turn.
    ///
    /// Missing or unknown keys get a fresh, not yet stored session. If the
    /// session was retired while this turn waited for the lock, a fresh one
    /// is used.
    pub async fn lock(&self, key: Option<&str>) -> OwnedMutexGuard<ConversationSession> {
        let mut key = key;
        loop {
            let handle = self.handle_for(key).await;
            let guard = handle.lock_owned().await;
            if !guard.retired {
                return guard;
            }
            tracing::debug!(
                session_id = %guard.id,
                "session retired while waiting, starting fresh"
            );
            key = None;
        }
    }

    async fn handle_for(&self, key: Option<&str>) -> SessionHandle {
        if let Some(key) = key
            && let Some(handle) = self.sessions.read().await.get(key)
        {
            return handle.clone();
        }

        let session = ConversationSession::new();
        tracing::debug!(session_id = %session.id, requested = ?key, "session started");
        Arc::new(Mutex::new(session))
    }

    /// Store the merged state of a turn.
    ///
    /// A fresh session enters the map with its first field; an empty one is
    /// dropped with the guard.
    pub async fn commit(
        &self,
        guard: &mut OwnedMutexGuard<ConversationSession>,
        merged: ConversationSession,
    ) {
        **guard = ConversationSession {
            updated_at: Utc::now(),
            ..merged
        };
        if guard.state() == SessionState::Empty {
            return;
        }

        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&guard.id) {
            let handle = Arc::clone(OwnedMutexGuard::mutex(guard));
            sessions.insert(guard.id.clone(), handle);
            tracing::debug!(session_id = %guard.id, "session stored");
        }
    }

    /// Retire a completed session and return the id of its replacement.
    ///
    /// The replacement is empty, so it is not stored until a later turn
    /// gives it a field.
    pub async fn retire(&self, guard: &mut OwnedMutexGuard<ConversationSession>) -> String {
        guard.retired = true;
        self.sessions.write().await.remove(&guard.id);

        let next_id = ConversationSession::new().id;
        tracing::info!(retired = %guard.id, next = %next_id, "session rotated");
        next_id
    }

    /// Snapshot a session by id, if it is stored and not mid-turn.
    pub async fn get(&self, key: &str) -> Option<ConversationSession> {
        let handle = self.sessions.read().await.get(key)?.clone();
        let session = handle.try_lock().ok()?.clone();
        Some(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than `ttl`. Sessions mid-turn are kept.
    pub async fn reap(&self, ttl: Duration) -> usize {
        let ttl =
            chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(5200));
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(mut session) => {
                let expired = now - session.updated_at > ttl;
                if expired {
                    session.retired = true;
                }
                !expired
            }
            Err(_) => true,
        });
        before - sessions.len()
    }
}

/// Periodically purge idle sessions.
///
/// Runs forever; intended to be spawned as a background tokio task.
pub async fn run_reaper(store: SessionStore, interval: Duration, ttl: Duration) {
    let mut ticker = time::interval(interval);
    // Skip the first tick (fires immediately).
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let reaped = store.reap(ttl).await;
        if reaped > 0 {
            let remaining = store.len().await;
            tracing::info!(reaped, remaining, "idle sessions purged");
        }
    }
}
