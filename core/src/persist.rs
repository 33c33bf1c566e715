use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::IndexState;

const WRITE_LOCK: &str = "write.lock";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn snapshot(&self) -> PathBuf {
        self.root.join("index.bin")
    }

    fn snapshot_tmp(&self) -> PathBuf {
        self.root.join("index.bin.tmp")
    }

    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }

    fn lock(&self) -> PathBuf {
        self.root.join(WRITE_LOCK)
    }
}

/// Exclusive-writer marker for an index directory. The file records the
/// owning PID; it is removed again when the guard drops.
pub struct WriteLock {
    path: PathBuf,
}

impl WriteLock {
    fn acquire(path: PathBuf) -> Result<Self> {
        match Self::try_create(&path) {
            Ok(lock) => Ok(lock),
            Err(SearchError::LockConflict { .. }) => match read_lock_owner(&path) {
                Some(pid) if process_alive(pid) => Err(SearchError::LockConflict {
                    path,
                    pid: Some(pid),
                }),
                Some(pid) => {
                    // Confirmed stale: the recorded owner is gone.
                    tracing::warn!(path = %path.display(), pid, "clearing stale write lock");
                    fs::remove_file(&path)
                        .map_err(|e| SearchError::io("remove stale write lock", e))?;
                    Self::try_create(&path)
                }
                // A lock without a readable owner cannot be confirmed stale,
                // so it is never cleared.
                None => Err(SearchError::LockConflict { path, pid: None }),
            },
            Err(e) => Err(e),
        }
    }

    fn try_create(path: &Path) -> Result<Self> {
        // Stage the owner pid in a sibling file and link it into place, so
        // the lock is never observable without its pid.
        let staged = path.with_file_name(format!("{WRITE_LOCK}.{}.tmp", std::process::id()));
        fs::write(&staged, std::process::id().to_string())
            .map_err(|e| SearchError::io("stage write lock", e))?;
        let linked = fs::hard_link(&staged, path);
        let _ = fs::remove_file(&staged);
        match linked {
            Ok(()) => Ok(WriteLock {
                path: path.to_path_buf(),
            }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(SearchError::LockConflict {
                path: path.to_path_buf(),
                pid: None,
            }),
            Err(e) => Err(SearchError::io("create write lock", e)),
        }
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to release write lock");
            }
        }
    }
}

fn read_lock_owner(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn process_alive(pid: u32) -> bool {
    #[cfg(target_os = "linux")]
    {
        Path::new("/proc").join(pid.to_string()).exists()
    }
    #[cfg(not(target_os = "linux"))]
    {
        // Liveness cannot be verified here, so never treat the lock as stale.
        let _ = pid;
        true
    }
}

/// Directory-backed snapshot of the index: `index.bin` (bincode) swapped in
/// atomically, a `meta.json` sidecar, and a `write.lock` held for the
/// lifetime of the writer.
pub struct DirectoryPersistence {
    paths: IndexPaths,
    _lock: WriteLock,
}

impl DirectoryPersistence {
    /// Opens an existing index directory or creates a fresh one, acquiring
    /// the write lock. A leftover lock is cleared only when its owning
    /// process is verifiably dead; a live owner is a `LockConflict`.
    pub(crate) fn open(root: &Path) -> Result<(Self, Option<IndexState>)> {
        fs::create_dir_all(root).map_err(|e| SearchError::io("create index directory", e))?;
        let paths = IndexPaths::new(root);
        let lock = WriteLock::acquire(paths.lock())?;
        let state = load_snapshot(&paths)?;
        Ok((
            DirectoryPersistence { paths, _lock: lock },
            state,
        ))
    }

    /// Writes a full snapshot. The data file is written to a temp path and
    /// renamed over the old one, so a failure leaves the previous snapshot
    /// intact.
    pub(crate) fn save(&self, state: &IndexState) -> Result<()> {
        let bytes =
            bincode::serialize(state).map_err(|e| SearchError::codec("encode index snapshot", e))?;
        let tmp = self.paths.snapshot_tmp();
        fs::write(&tmp, &bytes).map_err(|e| SearchError::io("write index snapshot", e))?;
        fs::rename(&tmp, self.paths.snapshot())
            .map_err(|e| SearchError::io("swap index snapshot", e))?;

        let meta = MetaFile {
            num_docs: state.store.len() as u32,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            version: SNAPSHOT_VERSION,
        };
        let json = serde_json::to_string_pretty(&meta)
            .map_err(|e| SearchError::io("encode index meta", e.into()))?;
        fs::write(self.paths.meta(), json).map_err(|e| SearchError::io("write index meta", e))?;
        tracing::debug!(num_docs = meta.num_docs, "persisted index snapshot");
        Ok(())
    }
}

fn load_snapshot(paths: &IndexPaths) -> Result<Option<IndexState>> {
    let bytes = match fs::read(paths.snapshot()) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SearchError::io("read index snapshot", e)),
    };
    let state =
        bincode::deserialize(&bytes).map_err(|e| SearchError::codec("decode index snapshot", e))?;
    Ok(Some(state))
}
