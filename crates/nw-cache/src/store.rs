// store.rs — SnapshotStore trait and its file/memory implementations.
//
// The SnapshotStore trait is the persistence seam for the goal cache.
// The contract is deliberately lopsided:
//
//   - load_all() cannot fail. Missing or corrupt storage logs a warning
//     and yields an empty list — a broken cache must never take the
//     session down.
//   - save_all() replaces the entire snapshot. No incremental writes, so
//     the cache and in-memory truth cannot drift apart.
//
// The on-disk layout is a single well-known file, `goals.json`, holding
// the full ordered list of goal records.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nw_goal::Goal;

use crate::error::CacheError;

/// Persistence seam for the goal snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the full snapshot. Tolerates missing or corrupt storage by
    /// returning an empty list; never fails.
    fn load_all(&self) -> Vec<Goal>;

    /// Replace the full snapshot with `goals`.
    fn save_all(&self, goals: &[Goal]) -> Result<(), CacheError>;
}

/// File name of the single snapshot value.
const SNAPSHOT_FILE: &str = "goals.json";

/// JSON file-based snapshot store.
///
/// The whole goal list lives in `<data_dir>/goals.json`, pretty-printed so
/// the cache is easy to inspect manually.
pub struct JsonSnapshotStore {
    data_dir: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|source| CacheError::IoError {
            path: data_dir.display().to_string(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    /// Path to the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load_all(&self) -> Vec<Goal> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Vec::new();
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "snapshot unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Goal>>(&raw) {
            Ok(goals) => goals,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "snapshot corrupt, starting empty");
                Vec::new()
            }
        }
    }

    fn save_all(&self, goals: &[Goal]) -> Result<(), CacheError> {
        let path = self.snapshot_path();
        let json = serde_json::to_string_pretty(goals)?;
        fs::write(&path, json).map_err(|source| CacheError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}

/// In-memory snapshot store for tests and cache-less sessions.
#[derive(Default)]
pub struct MemorySnapshotStore {
    goals: Mutex<Vec<Goal>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load_all(&self) -> Vec<Goal> {
        self.goals.lock().expect("snapshot lock poisoned").clone()
    }

    fn save_all(&self, goals: &[Goal]) -> Result<(), CacheError> {
        *self.goals.lock().expect("snapshot lock poisoned") = goals.to_vec();
        Ok(())
    }
}
