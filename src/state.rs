use crate::clock::Clock;
use crate::ledger::Ledger;
use crate::models::Status;
use crate::storage::{FileStore, LoadReport};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState<S = FileStore> {
    pub store: Arc<S>,
    pub clock: Arc<dyn Clock>,
    pub ledger: Arc<Mutex<Ledger>>,
    /// Set when startup could not read the stored history; cleared by the
    /// first save that replaces it.
    pub load_status: Arc<Mutex<Option<Status>>>,
}

impl<S> AppState<S> {
    pub fn new(store: S, clock: impl Clock + 'static, report: LoadReport) -> Self {
        Self {
            store: Arc::new(store),
            clock: Arc::new(clock),
            ledger: Arc::new(Mutex::new(report.ledger)),
            load_status: Arc::new(Mutex::new(report.status)),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ledger: Arc::clone(&self.ledger),
            load_status: Arc::clone(&self.load_status),
        }
    }
}
