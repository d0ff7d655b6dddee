use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};
use uuid::Uuid;

use gatepass_types::models::Submission;

/// Flat-file store of pending submissions.
///
/// The whole record set lives in memory behind a mutex and is mirrored to a
/// single JSON array file, rewritten in full after every mutation. Mutations
/// hold the lock across the load-mutate-save sequence, so in-process
/// append/remove cannot interleave. This is a single-writer design for small
/// record volumes, not a database.
///
/// Persistence failures never reach callers: a missing or corrupt backing
/// file loads as an empty set, and a failed save is logged and dropped — the
/// in-memory mirror stays authoritative for the life of the process.
pub struct RecordStore {
    path: PathBuf,
    records: Mutex<Vec<Submission>>,
}

impl RecordStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load(&path);
        info!(
            "Record store opened at {} ({} pending)",
            path.display(),
            records.len()
        );
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    /// Append a new submission and persist.
    pub fn append(&self, submission: Submission) {
        let mut records = self.lock();
        records.push(submission);
        self.save(&records);
    }

    /// Remove a submission by id and persist. Returns the removed record so
    /// the caller can clean up its proof file.
    pub fn remove(&self, id: Uuid) -> Option<Submission> {
        let mut records = self.lock();
        let index = records.iter().position(|r| r.id == id)?;
        let removed = records.remove(index);
        self.save(&records);
        Some(removed)
    }

    pub fn find(&self, id: Uuid) -> Option<Submission> {
        self.lock().iter().find(|r| r.id == id).cloned()
    }

    /// Current record list, in insertion order.
    pub fn snapshot(&self) -> Vec<Submission> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Submission>> {
        // A poisoned lock still holds a consistent record list.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Full rewrite of the backing file. Failures are logged, never surfaced.
    fn save(&self, records: &[Submission]) {
        let json = match serde_json::to_string_pretty(records) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize record store: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!(
                "Failed to persist record store at {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

fn load(path: &Path) -> Vec<Submission> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(
                "Failed to read record store at {}, starting empty: {}",
                path.display(),
                e
            );
            return Vec::new();
        }
    };

    match serde_json::from_str(&data) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                "Record store at {} is corrupt, starting empty: {}",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}
