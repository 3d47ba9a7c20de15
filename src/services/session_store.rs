//! Per-user state of the ranged statistics conversation.
//!
//! Sessions live only while a flow is in progress. The store is a trait so
//! the in-memory map can be swapped for a shared cache without touching the
//! conversation logic.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::database::models::StatKind;

/// Step of the ranged statistics flow the user is currently at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    AwaitingStatKind,
    AwaitingPredefinedRange,
    AwaitingStartDate,
    AwaitingEndDate,
}

/// Data collected so far. Every field is optional; see [`SessionPayload::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPayload {
    pub stat_kind: Option<StatKind>,
    pub start_date: Option<NaiveDateTime>,
    pub viewed_year: Option<i32>,
    pub viewed_month: Option<u32>,
}

impl SessionPayload {
    pub fn with_stat_kind(kind: StatKind) -> Self {
        Self {
            stat_kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_start_date(start: NaiveDateTime) -> Self {
        Self {
            start_date: Some(start),
            ..Self::default()
        }
    }

    pub fn viewing(year: i32, month: u32) -> Self {
        Self {
            viewed_year: Some(year),
            viewed_month: Some(month),
            ..Self::default()
        }
    }

    /// Copies every field set in `patch`; unset fields keep their value.
    pub fn merge(&mut self, patch: SessionPayload) {
        if patch.stat_kind.is_some() {
            self.stat_kind = patch.stat_kind;
        }
        if patch.start_date.is_some() {
            self.start_date = patch.start_date;
        }
        if patch.viewed_year.is_some() {
            self.viewed_year = patch.viewed_year;
        }
        if patch.viewed_month.is_some() {
            self.viewed_month = patch.viewed_month;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub state: FlowState,
    pub payload: SessionPayload,
    pub touched_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The live session of `user_id`. Sessions idle past the TTL read as absent.
    async fn get(&self, user_id: i64) -> Option<Session>;

    /// Creates or updates the session: `state` is replaced, `patch` is merged.
    async fn set(&self, user_id: i64, state: FlowState, patch: SessionPayload);

    async fn clear(&self, user_id: i64);

    /// Drops sessions idle for longer than the TTL at `now`. Returns how many.
    async fn evict_expired(&self, now: DateTime<Utc>) -> usize;

    /// Number of stored sessions, expired or not.
    async fn len(&self) -> usize;
}

/// Process-local [`SessionStore`] with idle expiry.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<i64, Session>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.touched_at) >= self.ttl
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: i64) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&user_id)
            .filter(|session| !self.is_expired(session, Utc::now()))
            .cloned()
    }

    async fn set(&self, user_id: i64, state: FlowState, patch: SessionPayload) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let expired = sessions
            .get(&user_id)
            .is_some_and(|session| self.is_expired(session, now));
        if expired {
            sessions.remove(&user_id);
        }

        let session = sessions.entry(user_id).or_insert_with(|| Session {
            state,
            payload: SessionPayload::default(),
            touched_at: now,
        });
        session.state = state;
        session.payload.merge(patch);
        session.touched_at = now;
    }

    async fn clear(&self, user_id: i64) {
        self.sessions.write().await.remove(&user_id);
    }

    async fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        before - sessions.len()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
