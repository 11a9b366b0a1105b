use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::models::Status;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::error;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load saved data";

/// The single durable slot the ledger is mirrored to.
pub trait ScoreStore: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn read(&self) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send + '_;

    /// Replaces the stored blob wholesale.
    fn write(&self, payload: Vec<u8>) -> impl Future<Output = io::Result<()>> + Send + '_;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn write(&self, payload: Vec<u8>) -> io::Result<()> {
        fs::write(&self.path, payload).await
    }
}

/// Keeps the blob in memory; used in place of the file in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail, as with a full disk.
    pub fn failing() -> Self {
        Self {
            blob: Mutex::new(None),
            fail_writes: true,
        }
    }

    pub async fn blob(&self) -> Option<Vec<u8>> {
        self.blob.lock().await.clone()
    }
}

impl ScoreStore for MemoryStore {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.blob.lock().await.clone())
    }

    async fn write(&self, payload: Vec<u8>) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "store is full"));
        }
        *self.blob.lock().await = Some(payload);
        Ok(())
    }
}

/// What startup found in the store.
#[derive(Debug)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub status: Option<Status>,
}

/// Reads the ledger back. Unreadable data yields an empty ledger and an
/// error status; the stored blob itself is not touched.
pub async fn load_ledger<S: ScoreStore>(store: &S) -> LoadReport {
    match try_load(store).await {
        Ok(ledger) => LoadReport {
            ledger,
            status: None,
        },
        Err(err) => {
            error!("failed to load score data: {err}");
            LoadReport {
                ledger: Ledger::default(),
                status: Some(Status::error(LOAD_FAILED_MESSAGE)),
            }
        }
    }
}

async fn try_load<S: ScoreStore>(store: &S) -> Result<Ledger, LedgerError> {
    match store.read().await? {
        Some(bytes) => Ledger::decode(&bytes),
        None => Ok(Ledger::default()),
    }
}

pub async fn persist_ledger<S: ScoreStore>(store: &S, ledger: &Ledger) -> Result<(), LedgerError> {
    let payload = ledger.encode()?;
    store.write(payload).await?;
    Ok(())
}
