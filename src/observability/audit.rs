//! Audit log of recovery runs
//!
//! - One JSON record per line, append-only
//! - Every run is recorded, whatever its outcome
//! - Records are synced before `append` returns

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recovery::{Outcome, RecoveryError, RecoveryRequest};

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub page_number: u64,
    pub relation: String,
    pub source: String,
    pub destination: String,
    pub mode: String,
    pub pretend: bool,
    /// Outcome name, or `FAILED`
    pub outcome: String,
    /// Whether the run should exit successfully
    #[serde(default)]
    pub success: bool,
    /// Whether any page bytes were written
    #[serde(default)]
    pub wrote: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lsn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_lsn: Option<String>,
}

impl AuditRecord {
    fn for_request(request: &RecoveryRequest, outcome: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            page_number: request.page_number,
            relation: request.relation.clone(),
            source: request.source.to_string(),
            destination: request.destination.to_string(),
            mode: request.mode.as_str().to_string(),
            pretend: request.pretend,
            outcome: outcome.into(),
            success: false,
            wrote: false,
            code: None,
            message: None,
            source_lsn: None,
            destination_lsn: None,
        }
    }

    /// Record a run that reached an outcome.
    pub fn completed(request: &RecoveryRequest, outcome: &Outcome) -> Self {
        let mut record = Self::for_request(request, outcome.as_str());
        record.success = outcome.is_success();
        record.wrote = outcome.wrote();
        if let Some(refusal) = outcome.refusal() {
            record.code = Some(refusal.code().to_string());
        }
        record.message = Some(outcome.describe());
        record
    }

    /// Record a run that faulted.
    pub fn failed(request: &RecoveryRequest, error: &RecoveryError) -> Self {
        let mut record = Self::for_request(request, "FAILED");
        record.code = Some(error.code().to_string());
        record.message = Some(error.to_string());
        record
    }

    pub fn with_lsns(mut self, source: Option<String>, destination: Option<String>) -> Self {
        self.source_lsn = source;
        self.destination_lsn = destination;
        self
    }

    /// Serialize to one JSON line (no trailing newline).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Append-only audit sink.
pub trait AuditLog {
    /// Append a record; the record is durable once this returns.
    fn append(&mut self, record: &AuditRecord) -> io::Result<()>;
}

/// File-based audit log, fsynced after every record.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    file: File,
}

impl FileAuditLog {
    /// Open or create an audit log file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn append(&mut self, record: &AuditRecord) -> io::Result<()> {
        let mut line = record.to_json()?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.sync_all()
    }
}

/// In-memory audit log, for callers that collect records themselves.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Vec<AuditRecord>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&mut self, record: &AuditRecord) -> io::Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DecodeError;
    use crate::recovery::{Mode, Refusal, Side};
    use crate::target::TargetRef;
    use std::fs;
    use tempfile::tempdir;

    fn request() -> RecoveryRequest {
        RecoveryRequest {
            page_number: 7,
            relation: "base/1/2".to_string(),
            source: TargetRef::parse("u@good:/data"),
            destination: TargetRef::parse("/data"),
            mode: Mode::Replace,
            pretend: false,
        }
    }

    #[test]
    fn test_completed_record() {
        let record = AuditRecord::completed(&request(), &Outcome::Refused(Refusal::SourceInvalid));
        assert_eq!(record.outcome, "REFUSED");
        assert_eq!(record.code.as_deref(), Some("PAGEFIX_REFUSED_SOURCE_INVALID"));
        assert_eq!(record.source, "u@good:/data");
        assert_eq!(record.mode, "replace");
        assert!(!record.success);
        assert!(!record.wrote);
    }

    #[test]
    fn test_completed_record_marks_writes() {
        let replaced = AuditRecord::completed(&request(), &Outcome::Replaced);
        assert!(replaced.success);
        assert!(replaced.wrote);

        let pretend = AuditRecord::completed(&request(), &Outcome::WouldReplace);
        assert!(pretend.success);
        assert!(!pretend.wrote);
    }

    #[test]
    fn test_failed_record() {
        let err = RecoveryError::Decode {
            side: Side::Source,
            path: "/data/base/1/2".to_string(),
            source: DecodeError::InvalidSize { len: 12 },
        };
        let record = AuditRecord::failed(&request(), &err);
        assert_eq!(record.outcome, "FAILED");
        assert_eq!(record.code.as_deref(), Some("PAGEFIX_DECODE_FAILED"));
        assert!(!record.success);
        assert!(!record.wrote);
    }

    #[test]
    fn test_json_round_trip_skips_absent_fields() {
        let record = AuditRecord::completed(&request(), &Outcome::Replaced)
            .with_lsns(Some("0/10".to_string()), None);
        let json = record.to_json().unwrap();
        assert!(!json.contains("destination_lsn"));

        let parsed: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_memory_audit_log() {
        let mut log = MemoryAuditLog::new();
        assert!(log.is_empty());
        log.append(&AuditRecord::completed(&request(), &Outcome::WouldReplace)).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].outcome, "WOULD_REPLACE");
    }

    #[test]
    fn test_file_audit_log_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");

        {
            let mut log = FileAuditLog::open(&path).unwrap();
            log.append(&AuditRecord::completed(&request(), &Outcome::Replaced)).unwrap();
        }
        {
            let mut log = FileAuditLog::open(&path).unwrap();
            log.append(&AuditRecord::completed(&request(), &Outcome::WouldReplace)).unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"REPLACED\""));
        assert!(lines[1].contains("\"WOULD_REPLACE\""));
    }
}
