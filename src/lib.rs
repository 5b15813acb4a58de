pub mod app;
pub mod config;
pub mod errors;
pub mod gate;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod records;
pub mod sessions;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use errors::{LedgerError, StoreError};
pub use gate::{Gate, Identity, Role, Scope};
pub use ledger::Ledger;
pub use records::{normalize, normalize_on, summarize};
pub use state::AppState;
pub use storage::{JsonFileStore, RecordFilter, RecordStore};
