use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{epoch_to_timestamp, format_timestamp, load_record};
use crate::core::{Handle, NoodleConfig, NoodleError, ProbeTarget};

const KIND: &str = "inode";

/// Record as printed by the kernel module
#[derive(Debug, Deserialize)]
struct RawInode {
    no: u64,
    bytes: u64,
    atime: i64,
    mtime: i64,
    ctime: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeRecord {
    pub number: u64,
    pub size: u64,
    pub access_time: DateTime<Utc>,
    pub modification_time: DateTime<Utc>,
    pub creation_time: DateTime<Utc>,
}

impl InodeRecord {
    fn from_raw(raw: RawInode) -> Result<Self, String> {
        Ok(Self {
            number: raw.no,
            size: raw.bytes,
            access_time: epoch_to_timestamp("atime", raw.atime)?,
            modification_time: epoch_to_timestamp("mtime", raw.mtime)?,
            creation_time: epoch_to_timestamp("ctime", raw.ctime)?,
        })
    }

    pub fn parse_file(path: &Path) -> Result<Self, NoodleError> {
        let raw: RawInode = load_record(KIND, path)?;
        Self::from_raw(raw).map_err(|reason| NoodleError::malformed(KIND, path, reason))
    }
}

/// Looks up the inode behind a filesystem path
#[derive(Debug, Clone)]
pub struct InodeHandle {
    path: PathBuf,
}

impl InodeHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Handle for InodeHandle {
    type Record = InodeRecord;

    fn kind(&self) -> &'static str {
        KIND
    }

    fn target<'a>(&self, config: &'a NoodleConfig) -> &'a ProbeTarget {
        &config.inode
    }

    fn selector(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    fn parse(&self, path: &Path) -> Result<InodeRecord, NoodleError> {
        InodeRecord::parse_file(path)
    }

    fn render(&self, record: &InodeRecord) -> Vec<String> {
        vec![
            format!("Inode for {}", self.path.display()),
            format!("No: {}", record.number),
            format!("Size: {}", record.size),
            format!("Created: {}", format_timestamp(&record.creation_time)),
            format!("Modified: {}", format_timestamp(&record.modification_time)),
            format!("Accessed: {}", format_timestamp(&record.access_time)),
        ]
    }
}
