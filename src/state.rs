use crate::ledger::Ledger;
use crate::sessions::SessionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            sessions: Arc::new(SessionStore::default()),
        }
    }
}
