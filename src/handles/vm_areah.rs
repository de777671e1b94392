use serde::Deserialize;
use std::path::Path;

use super::{flag_to_bool, format_bool, load_record, sentinel_to_option};
use crate::core::{Handle, NoodleConfig, NoodleError, ProbeTarget};

const KIND: &str = "vm_area";

#[derive(Debug, Deserialize)]
struct RawVmArea {
    start: u64,
    end: u64,
    flags: u64,
    prev: i64,
    next: i64,
    file_inode: i64,
}

/// First memory area of a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmAreaRecord {
    pub start: u64,
    pub end: u64,
    pub flags: u64,
    pub has_prev: bool,
    pub has_next: bool,
    /// Inode of the mapped file, `None` for anonymous mappings
    pub file_inode: Option<i64>,
}

impl VmAreaRecord {
    fn from_raw(raw: RawVmArea) -> Self {
        Self {
            start: raw.start,
            end: raw.end,
            flags: raw.flags,
            has_prev: flag_to_bool(raw.prev),
            has_next: flag_to_bool(raw.next),
            file_inode: sentinel_to_option(raw.file_inode),
        }
    }

    pub fn parse_file(path: &Path) -> Result<Self, NoodleError> {
        let raw: RawVmArea = load_record(KIND, path)?;
        let record = Self::from_raw(raw);

        if record.end < record.start {
            log::warn!(
                "vm_area end {:#x} is below start {:#x}, printing as reported",
                record.end,
                record.start
            );
        }
        if let Some(inode) = record.file_inode.filter(|i| *i < 0) {
            log::warn!("vm_area file_inode {} is negative, printing as reported", inode);
        }

        Ok(record)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VmAreaHandle {
    pid: u32,
}

impl VmAreaHandle {
    pub fn new(pid: u32) -> Self {
        Self { pid }
    }
}

impl Handle for VmAreaHandle {
    type Record = VmAreaRecord;

    fn kind(&self) -> &'static str {
        KIND
    }

    fn target<'a>(&self, config: &'a NoodleConfig) -> &'a ProbeTarget {
        &config.vm_area
    }

    fn selector(&self) -> String {
        self.pid.to_string()
    }

    fn parse(&self, path: &Path) -> Result<VmAreaRecord, NoodleError> {
        VmAreaRecord::parse_file(path)
    }

    fn render(&self, record: &VmAreaRecord) -> Vec<String> {
        let file = match record.file_inode {
            Some(inode) => format!("File: {}", inode),
            None => "File: nothing attached".to_string(),
        };
        vec![
            format!("VM area for pid={}", self.pid),
            format!("Start: {}", record.start),
            format!("End: {}", record.end),
            format!("Flags: {}", record.flags),
            format!("Has previous: {}", format_bool(record.has_prev)),
            format!("Has next: {}", format_bool(record.has_next)),
            file,
        ]
    }
}
