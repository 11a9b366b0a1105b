pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod state;
pub mod storage;
pub mod summary;
pub mod ui;

pub use app::router;
pub use clock::{Clock, LocalClock};
pub use config::Config;
pub use ledger::Ledger;
pub use state::AppState;
pub use storage::{load_ledger, FileStore, ScoreStore};
