//! Append-only metric stores
//!
//! The analysis engines only need two operations from storage: append in
//! receipt order and a full ordered read. [`MetricStore`] captures that
//! contract; [`InMemoryMetricStore`] keeps events in a lock-guarded vector and
//! [`NdjsonFileStore`] persists them as one JSON line per event.

use crate::error::StoreError;
use crate::types::FrictionEvent;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Receipt acknowledgement: the event's position in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub index: usize,
}

/// Ordered, append-only event log.
///
/// Appends are serialized; reads return a point-in-time snapshot and never
/// observe a partially appended event.
pub trait MetricStore: Send + Sync {
    /// Append an event that has already been stamped with its receipt time
    fn append(&self, event: FrictionEvent) -> Result<Accepted, StoreError>;

    /// Full history in receipt order
    fn read_all(&self) -> Result<Vec<FrictionEvent>, StoreError>;

    /// Events received after the first `cursor` entries
    fn read_since(&self, cursor: usize) -> Result<Vec<FrictionEvent>, StoreError> {
        Ok(self.read_all()?.into_iter().skip(cursor).collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read_all()?.len())
    }

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// Volatile store living for the process lifetime
#[derive(Debug, Default)]
pub struct InMemoryMetricStore {
    events: RwLock<Vec<FrictionEvent>>,
}

impl InMemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricStore for InMemoryMetricStore {
    fn append(&self, event: FrictionEvent) -> Result<Accepted, StoreError> {
        let mut events = self.events.write().map_err(|_| StoreError::Poisoned)?;
        events.push(event);
        Ok(Accepted {
            index: events.len() - 1,
        })
    }

    fn read_all(&self) -> Result<Vec<FrictionEvent>, StoreError> {
        let events = self.events.read().map_err(|_| StoreError::Poisoned)?;
        Ok(events.clone())
    }

    fn read_since(&self, cursor: usize) -> Result<Vec<FrictionEvent>, StoreError> {
        let events = self.events.read().map_err(|_| StoreError::Poisoned)?;
        Ok(events.iter().skip(cursor).cloned().collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let events = self.events.read().map_err(|_| StoreError::Poisoned)?;
        Ok(events.len())
    }
}

/// Durable store backed by a newline-delimited JSON file
#[derive(Debug)]
pub struct NdjsonFileStore {
    path: PathBuf,
    /// Open append handle plus the number of entries written so far
    writer: Mutex<(File, usize)>,
}

impl NdjsonFileStore {
    /// Open (or create) the log at `path`, counting existing entries.
    ///
    /// A final line cut short by an interrupted append is truncated away.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let existing = if path.exists() {
            let log = Self::read_file(&path)?;
            if let Some(valid_len) = log.torn_at {
                log::warn!(
                    "Truncating incomplete final entry in {} at byte {}",
                    path.display(),
                    valid_len
                );
                OpenOptions::new().write(true).open(&path)?.set_len(valid_len)?;
            }
            log.events.len()
        } else {
            0
        };
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new((file, existing)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Result<StoredLog, StoreError> {
        let bytes = std::fs::read(path)?;
        // A torn append can split a multi-byte character
        let contents = String::from_utf8_lossy(&bytes);
        let mut events = Vec::new();
        let mut offset = 0usize;

        for (line_num, line) in contents.split_inclusive('\n').enumerate() {
            let start = offset;
            offset += line.len();
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<FrictionEvent>(trimmed) {
                Ok(event) => events.push(event),
                // Only the unterminated last line can be a torn append
                Err(e) if !line.ends_with('\n') => {
                    log::warn!(
                        "Skipping incomplete final entry at line {} of {}: {}",
                        line_num + 1,
                        path.display(),
                        e
                    );
                    return Ok(StoredLog {
                        events,
                        torn_at: Some(start as u64),
                    });
                }
                Err(e) => {
                    return Err(StoreError::Corrupt {
                        line: line_num + 1,
                        message: e.to_string(),
                    })
                }
            }
        }

        Ok(StoredLog {
            events,
            torn_at: None,
        })
    }
}

/// Parsed file contents
struct StoredLog {
    events: Vec<FrictionEvent>,
    /// Byte length of the intact prefix when the last line is incomplete
    torn_at: Option<u64>,
}

impl MetricStore for NdjsonFileStore {
    fn append(&self, event: FrictionEvent) -> Result<Accepted, StoreError> {
        let line = serde_json::to_string(&event)?;
        let mut guard = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        let (file, count) = &mut *guard;
        let before = file.metadata()?.len();
        if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
            if let Err(truncate) = file.set_len(before) {
                log::error!(
                    "Could not roll back partial entry in {}: {}",
                    self.path.display(),
                    truncate
                );
            }
            return Err(e.into());
        }
        *count += 1;
        Ok(Accepted { index: *count - 1 })
    }

    fn read_all(&self) -> Result<Vec<FrictionEvent>, StoreError> {
        // Holding the writer lock keeps a concurrent append from being read half-written
        let _guard = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(Self::read_file(&self.path)?.events)
    }

    fn len(&self) -> Result<usize, StoreError> {
        let guard = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.1)
    }
}
