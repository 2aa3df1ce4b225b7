//! Session management for bot users

use crate::error::{BotError, Result};
use crate::interface::BotPlatform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// What the user is expected to type next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingPhone,
    AwaitingIp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub platform: BotPlatform,
    pub state: ConversationState,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, platform: BotPlatform) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            platform,
            state: ConversationState::Idle,
            created_at: now,
            last_active: now,
        }
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn is_expired(&self, max_age_seconds: i64) -> bool {
        let max_age = chrono::Duration::seconds(max_age_seconds);
        Utc::now() - self.last_active > max_age
    }
}

/// Backing store for sessions.
///
/// Methods take `&self`; implementations synchronise internally so one store
/// can be shared by every concurrently running handler.
pub trait SessionStorage: Send + Sync {
    fn get(&self, user_id: &str) -> Result<Option<UserSession>>;

    /// Atomically set the state of `user_id`, creating the session if needed,
    /// and return the session as it was before the change.
    fn replace_state(
        &self,
        user_id: &str,
        platform: BotPlatform,
        state: ConversationState,
    ) -> Result<Option<UserSession>>;

    /// Atomically mark `user_id` as active, creating the session if needed.
    /// A session idle for longer than `max_age_seconds` is reset to `Idle`
    /// before it is refreshed.
    fn touch(&self, user_id: &str, platform: BotPlatform, max_age_seconds: i64) -> Result<()>;

    fn cleanup_expired(&self, max_age_seconds: i64) -> usize;

    /// Sessions that have not yet expired
    fn count_active(&self, max_age_seconds: i64) -> usize;

    /// All stored sessions, expired or not
    fn len(&self) -> usize;
}

#[derive(Default)]
pub struct InMemoryStorage {
    sessions: RwLock<HashMap<String, UserSession>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> BotError {
    BotError::Session(format!("Lock error: {e}"))
}

impl SessionStorage for InMemoryStorage {
    fn get(&self, user_id: &str) -> Result<Option<UserSession>> {
        Ok(self.sessions.read().map_err(lock_error)?.get(user_id).cloned())
    }

    fn replace_state(
        &self,
        user_id: &str,
        platform: BotPlatform,
        state: ConversationState,
    ) -> Result<Option<UserSession>> {
        let mut sessions = self.sessions.write().map_err(lock_error)?;
        let previous = sessions.get(user_id).cloned();
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| UserSession::new(user_id, platform));

        session.state = state;
        session.update_activity();
        Ok(previous)
    }

    fn touch(&self, user_id: &str, platform: BotPlatform, max_age_seconds: i64) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(lock_error)?;
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| UserSession::new(user_id, platform));

        if session.is_expired(max_age_seconds) {
            session.state = ConversationState::Idle;
        }
        session.update_activity();
        Ok(())
    }

    fn cleanup_expired(&self, max_age_seconds: i64) -> usize {
        let Ok(mut sessions) = self.sessions.write() else {
            return 0;
        };

        let initial_count = sessions.len();
        sessions.retain(|_, session| !session.is_expired(max_age_seconds));
        initial_count - sessions.len()
    }

    fn count_active(&self, max_age_seconds: i64) -> usize {
        self.sessions
            .read()
            .map(|s| s.values().filter(|session| !session.is_expired(max_age_seconds)).count())
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or_default()
    }
}

/// Per-user conversation state, shared across handlers
pub struct SessionManager {
    storage: Box<dyn SessionStorage>,
    default_platform: BotPlatform,
    session_ttl: i64,
}

impl SessionManager {
    pub fn new(platform: BotPlatform) -> Self {
        Self::with_storage(Box::new(InMemoryStorage::new()), platform)
    }

    pub fn with_storage(storage: Box<dyn SessionStorage>, platform: BotPlatform) -> Self {
        Self {
            storage,
            default_platform: platform,
            session_ttl: 3600,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        self
    }

    pub fn platform(&self) -> BotPlatform {
        self.default_platform
    }

    /// Current state; `Idle` for unknown or expired sessions
    pub fn state(&self, user_id: &str) -> Result<ConversationState> {
        Ok(self
            .storage
            .get(user_id)?
            .filter(|session| !session.is_expired(self.session_ttl))
            .map(|session| session.state)
            .unwrap_or_default())
    }

    /// Record what the user should send next
    pub fn expect(&self, user_id: &str, state: ConversationState) -> Result<()> {
        self.storage
            .replace_state(user_id, self.default_platform, state)
            .map(|_| ())
    }

    /// Reset the user to `Idle` and return what was pending.
    ///
    /// A pending state on an expired session counts as `Idle`.
    pub fn take_state(&self, user_id: &str) -> Result<ConversationState> {
        let previous = self
            .storage
            .replace_state(user_id, self.default_platform, ConversationState::Idle)?;
        Ok(previous
            .filter(|session| !session.is_expired(self.session_ttl))
            .map(|session| session.state)
            .unwrap_or_default())
    }

    /// Mark the user as active. A live pending state is kept; an expired one
    /// is dropped.
    pub fn touch(&self, user_id: &str) -> Result<()> {
        self.storage
            .touch(user_id, self.default_platform, self.session_ttl)
    }

    pub fn cleanup_expired(&self) -> usize {
        self.storage.cleanup_expired(self.session_ttl)
    }

    /// Users whose session has not expired
    pub fn active_count(&self) -> usize {
        self.storage.count_active(self.session_ttl)
    }

    /// Periodically drop expired sessions
    pub fn spawn_sweeper(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.cleanup_expired();
                if removed > 0 {
                    debug!(removed, remaining = self.storage.len(), "Swept expired sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn idle_for(user_id: &str, seconds: i64, state: ConversationState) -> UserSession {
        let mut session = UserSession::new(user_id, BotPlatform::Cli);
        session.state = state;
        session.last_active = Utc::now() - chrono::Duration::seconds(seconds);
        session
    }

    fn seeded(sessions: Vec<UserSession>) -> InMemoryStorage {
        InMemoryStorage {
            sessions: RwLock::new(
                sessions
                    .into_iter()
                    .map(|session| (session.user_id.clone(), session))
                    .collect(),
            ),
        }
    }

    fn manager_with(sessions: Vec<UserSession>) -> SessionManager {
        SessionManager::with_storage(Box::new(seeded(sessions)), BotPlatform::Cli)
            .with_ttl(Duration::from_secs(60))
    }

    #[test]
    fn test_new_user_is_idle() {
        let manager = SessionManager::new(BotPlatform::Telegram);
        assert_eq!(manager.state("42").unwrap(), ConversationState::Idle);
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn test_take_state_clears_once() {
        let manager = SessionManager::new(BotPlatform::Telegram);
        manager.expect("42", ConversationState::AwaitingPhone).unwrap();

        assert_eq!(
            manager.take_state("42").unwrap(),
            ConversationState::AwaitingPhone
        );
        assert_eq!(manager.take_state("42").unwrap(), ConversationState::Idle);
        assert_eq!(manager.state("42").unwrap(), ConversationState::Idle);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let manager = SessionManager::new(BotPlatform::Telegram);
        manager.expect("alice", ConversationState::AwaitingPhone).unwrap();
        manager.expect("bob", ConversationState::AwaitingIp).unwrap();

        assert_eq!(
            manager.take_state("alice").unwrap(),
            ConversationState::AwaitingPhone
        );
        assert_eq!(manager.state("bob").unwrap(), ConversationState::AwaitingIp);
        assert_eq!(manager.active_count(), 2);
    }

    #[test]
    fn test_expired_sessions() {
        let manager = manager_with(vec![
            idle_for("old", 120, ConversationState::AwaitingIp),
            UserSession::new("fresh", BotPlatform::Cli),
        ]);

        assert_eq!(manager.state("old").unwrap(), ConversationState::Idle);
        assert_eq!(manager.cleanup_expired(), 1);
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn test_expired_pending_state_is_dropped() {
        let manager = manager_with(vec![idle_for("old", 120, ConversationState::AwaitingPhone)]);

        assert_eq!(manager.take_state("old").unwrap(), ConversationState::Idle);
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn test_touch_keeps_state() {
        let manager = SessionManager::new(BotPlatform::Cli);
        manager.expect("42", ConversationState::AwaitingIp).unwrap();
        manager.touch("42").unwrap();
        assert_eq!(manager.state("42").unwrap(), ConversationState::AwaitingIp);
    }

    #[test]
    fn test_touch_resets_expired_state() {
        let manager = manager_with(vec![idle_for("old", 120, ConversationState::AwaitingPhone)]);

        manager.touch("old").unwrap();
        assert_eq!(manager.state("old").unwrap(), ConversationState::Idle);
        assert_eq!(manager.take_state("old").unwrap(), ConversationState::Idle);
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn test_active_count_skips_expired() {
        let storage = seeded(vec![
            idle_for("old", 120, ConversationState::Idle),
            UserSession::new("fresh", BotPlatform::Cli),
        ]);
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.count_active(60), 1);

        let manager = SessionManager::with_storage(Box::new(storage), BotPlatform::Cli)
            .with_ttl(Duration::from_secs(60));
        assert_eq!(manager.active_count(), 1);
    }

    /// Counts sweeps and what they removed
    struct SweepCounter {
        inner: InMemoryStorage,
        removed: Arc<AtomicUsize>,
    }

    impl SessionStorage for SweepCounter {
        fn get(&self, user_id: &str) -> Result<Option<UserSession>> {
            self.inner.get(user_id)
        }

        fn replace_state(
            &self,
            user_id: &str,
            platform: BotPlatform,
            state: ConversationState,
        ) -> Result<Option<UserSession>> {
            self.inner.replace_state(user_id, platform, state)
        }

        fn touch(&self, user_id: &str, platform: BotPlatform, max_age_seconds: i64) -> Result<()> {
            self.inner.touch(user_id, platform, max_age_seconds)
        }

        fn cleanup_expired(&self, max_age_seconds: i64) -> usize {
            let removed = self.inner.cleanup_expired(max_age_seconds);
            self.removed.fetch_add(removed, Ordering::SeqCst);
            removed
        }

        fn count_active(&self, max_age_seconds: i64) -> usize {
            self.inner.count_active(max_age_seconds)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[tokio::test]
    async fn test_sweeper_runs() {
        let removed = Arc::new(AtomicUsize::new(0));
        let storage = SweepCounter {
            inner: seeded(vec![idle_for("old", 120, ConversationState::Idle)]),
            removed: Arc::clone(&removed),
        };

        let manager = Arc::new(
            SessionManager::with_storage(Box::new(storage), BotPlatform::Cli)
                .with_ttl(Duration::from_secs(60)),
        );
        let handle = Arc::clone(&manager).spawn_sweeper(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(removed.load(Ordering::SeqCst), 1);
    }
}
