//! core::audit
//!
//! Append-only audit trail of executed commands.
//!
//! # Storage
//!
//! - `<home>/logs/audit.log` - one JSON object per line
//!
//! # Invariants
//!
//! - Entries are only ever appended, never rewritten
//! - Each append holds an exclusive OS-level lock on the file, so concurrent
//!   curveadm processes never interleave partial lines
//! - Unparseable lines are skipped on read rather than failing the listing

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from audit log operations.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to access audit log '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode audit entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One executed command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry id
    pub id: Uuid,
    /// When the command finished
    pub executed_at: DateTime<Utc>,
    /// Working directory of the invocation
    pub work_dir: String,
    /// Full command line, starting with `curveadm`
    pub command: String,
    /// Whether the action returned successfully
    pub success: bool,
}

impl AuditEntry {
    /// Create an entry stamped with the current time.
    pub fn new(command: impl Into<String>, work_dir: impl Into<String>, success: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            executed_at: Utc::now(),
            work_dir: work_dir.into(),
            command: command.into(),
            success,
        }
    }
}

/// Handle to an audit log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Audit log at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Audit log at its standard location under the curveadm home.
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join("logs").join("audit.log"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry, creating the file and its directory if needed.
    pub fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        file.lock_exclusive().map_err(|e| self.io_error(e))?;
        let written = file.write_all(line.as_bytes());
        let unlocked = FileExt::unlock(&file);
        written.map_err(|e| self.io_error(e))?;
        unlocked.map_err(|e| self.io_error(e))?;

        Ok(())
    }

    /// All entries, oldest first. A missing file yields no entries.
    pub fn entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(path = %self.path.display(), "skipping audit line: {e}"),
            }
        }
        Ok(entries)
    }

    /// The newest `count` entries, oldest first.
    pub fn tail(&self, count: usize) -> Result<Vec<AuditEntry>, AuditError> {
        let mut entries = self.entries()?;
        let skip = entries.len().saturating_sub(count);
        Ok(entries.split_off(skip))
    }

    fn io_error(&self, source: std::io::Error) -> AuditError {
        AuditError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_has_no_entries() {
        let temp = TempDir::new().unwrap();
        let log = AuditLog::in_home(temp.path());
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn append_creates_directories_and_preserves_order() {
        let temp = TempDir::new().unwrap();
        let log = AuditLog::in_home(temp.path());

        log.append(&AuditEntry::new("curveadm deploy", "/root", true))
            .unwrap();
        log.append(&AuditEntry::new("curveadm stop", "/root", false))
            .unwrap();

        assert!(temp.path().join("logs/audit.log").exists());
        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "curveadm deploy");
        assert!(entries[0].success);
        assert_eq!(entries[1].command, "curveadm stop");
        assert!(!entries[1].success);
    }

    #[test]
    fn tail_returns_newest_entries() {
        let temp = TempDir::new().unwrap();
        let log = AuditLog::in_home(temp.path());
        for verb in ["deploy", "start", "stop", "clean"] {
            log.append(&AuditEntry::new(format!("curveadm {verb}"), "/", true))
                .unwrap();
        }

        let tail = log.tail(2).unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].command, "curveadm stop");
        assert_eq!(tail[1].command, "curveadm clean");

        assert_eq!(log.tail(10).unwrap().len(), 4);
    }

    #[test]
    fn corrupt_lines_are_skipped() {
        let temp = TempDir::new().unwrap();
        let log = AuditLog::in_home(temp.path());
        log.append(&AuditEntry::new("curveadm status", "/", true))
            .unwrap();

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{not json").unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "curveadm status");
    }
}
