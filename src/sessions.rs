use crate::gate::Identity;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A logged-in identity and the token that refers to it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

/// Sessions idle for longer than this are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(8 * 60 * 60);

struct Entry {
    identity: Identity,
    last_seen: Instant,
}

/// In-memory token registry owned by the HTTP layer. Sessions end on logout,
/// after sitting idle for the configured TTL, or on process restart.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub async fn open(&self, identity: Identity) -> Session {
        let token = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_ttl);
        sessions.insert(
            token.clone(),
            Entry {
                identity: identity.clone(),
                last_seen: now,
            },
        );
        Session { token, identity }
    }

    /// Resolves a token and refreshes its idle timer. Expired tokens are removed.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        if now.duration_since(sessions.get(token)?.last_seen) >= self.idle_ttl {
            sessions.remove(token);
            return None;
        }
        let entry = sessions.get_mut(token)?;
        entry.last_seen = now;
        Some(Session {
            token: token.to_string(),
            identity: entry.identity.clone(),
        })
    }

    pub async fn close(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Role;

    fn identity(name: &str) -> Identity {
        Identity {
            name: name.into(),
            role: Role::Regular,
        }
    }

    #[tokio::test]
    async fn sessions_open_resolve_and_close() {
        let store = SessionStore::default();
        let first = store.open(identity("pachuca")).await;
        let second = store.open(identity("pachuca")).await;
        assert_ne!(first.token, second.token);

        let found = store.get(&first.token).await.unwrap();
        assert_eq!(found.identity.name, "pachuca");

        assert!(store.close(&first.token).await);
        assert!(!store.close(&first.token).await);
        assert!(store.get(&first.token).await.is_none());
        assert!(store.get(&second.token).await.is_some());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::with_idle_ttl(Duration::ZERO);
        let session = store.open(identity("pachuca")).await;
        assert!(store.get(&session.token).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn opening_a_session_prunes_expired_ones() {
        let store = SessionStore::with_idle_ttl(Duration::ZERO);
        for _ in 0..5 {
            store.open(identity("pachuca")).await;
        }
        assert_eq!(store.len().await, 1);

        let store = SessionStore::default();
        for _ in 0..5 {
            store.open(identity("pachuca")).await;
        }
        assert_eq!(store.len().await, 5);
    }
}
