//! JSON-file tournament store: one file per tournament in a data directory.

use async_trait::async_trait;
use fs4::fs_std::FileExt;
use log::debug;
use rink_engine::store::{StoreError, StoreResult, TournamentStore};
use rink_engine::tournament::{Revision, Tournament};
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::task;

const EXTENSION: &str = "json";
const LOCK_EXTENSION: &str = "lock";

/// Stores each tournament as pretty-printed JSON.
///
/// Every write holds an exclusive advisory lock on a `<name>.lock` sidecar
/// file for the whole read-check-write, so the revision check holds across
/// processes and across store instances. Files are written to a uniquely
/// named temporary file in the same directory and renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

/// Held for the duration of a write; the lock is released when the file closes
struct WriteLock {
    _file: File,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a tournament name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", encode_name(name)))
    }

    fn lock_path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{LOCK_EXTENSION}", encode_name(name)))
    }

    /// Block (off the async runtime) until this process owns the tournament's lock
    async fn lock(&self, name: &str) -> StoreResult<WriteLock> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.lock_path_for(name);

        let file = task::spawn_blocking(move || -> io::Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;
            FileExt::lock_exclusive(&file)?;
            Ok(file)
        })
        .await
        .map_err(|e| StoreError::Transport(format!("lock task failed: {e}")))??;

        Ok(WriteLock { _file: file })
    }

    async fn read(&self, name: &str) -> StoreResult<Tournament> {
        match fs::read(self.path_for(name)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the tournament file. Callers hold the tournament's [`WriteLock`].
    async fn write(&self, tournament: &Tournament, _lock: &WriteLock) -> StoreResult<()> {
        let dir = self.dir.clone();
        let path = self.path_for(&tournament.name);
        let bytes = serde_json::to_vec_pretty(tournament)?;

        let target = path.clone();
        task::spawn_blocking(move || -> io::Result<()> {
            let mut temp = NamedTempFile::new_in(&dir)?;
            temp.write_all(&bytes)?;
            temp.as_file().sync_all()?;
            temp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Transport(format!("write task failed: {e}")))??;

        debug!("Wrote {} (revision {})", path.display(), tournament.revision);
        Ok(())
    }
}

#[async_trait]
impl TournamentStore for JsonFileStore {
    async fn load(&self, name: &str) -> StoreResult<Tournament> {
        self.read(name).await
    }

    async fn load_all(&self) -> StoreResult<Vec<Tournament>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut all = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                let bytes = fs::read(&path).await?;
                all.push(serde_json::from_slice::<Tournament>(&bytes)?);
            }
        }

        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn create(&self, tournament: &Tournament) -> StoreResult<()> {
        let lock = self.lock(&tournament.name).await?;
        if fs::try_exists(self.path_for(&tournament.name)).await? {
            return Err(StoreError::AlreadyExists(tournament.name.clone()));
        }
        self.write(tournament, &lock).await
    }

    async fn save(&self, tournament: &Tournament, expected: Revision) -> StoreResult<Revision> {
        let lock = self.lock(&tournament.name).await?;
        let stored = self.read(&tournament.name).await?;
        if stored.revision != expected {
            return Err(StoreError::Conflict {
                name: tournament.name.clone(),
                expected,
                actual: stored.revision,
            });
        }

        self.write(tournament, &lock).await?;
        Ok(tournament.revision)
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let _lock = self.lock(name).await?;
        match fs::remove_file(self.path_for(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Filesystem-safe file stem. ASCII letters, digits, `-` and `_` pass
/// through; every other byte becomes `%XX`.
fn encode_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
