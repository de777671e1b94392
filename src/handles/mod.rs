pub mod inodeh;
pub mod vm_areah;

pub use inodeh::{InodeHandle, InodeRecord};
pub use vm_areah::{VmAreaHandle, VmAreaRecord};

use chrono::{DateTime, Local, Utc};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::core::NoodleError;

/// Read `path` and decode it as the wire shape `T`
pub(crate) fn load_record<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Result<T, NoodleError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| NoodleError::malformed(kind, path, format!("cannot read: {}", e)))?;
    serde_json::from_str(&text).map_err(|e| NoodleError::malformed(kind, path, e.to_string()))
}

/// Epoch seconds to an instant; negative or out-of-range values are rejected
pub(crate) fn epoch_to_timestamp(field: &str, secs: i64) -> Result<DateTime<Utc>, String> {
    if secs < 0 {
        return Err(format!("{} is negative: {}", field, secs));
    }
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("{} is out of range: {}", field, secs))
}

pub(crate) fn flag_to_bool(value: i64) -> bool {
    value != 0
}

/// `-1` means absent, anything else is kept as is
pub(crate) fn sentinel_to_option(value: i64) -> Option<i64> {
    if value == -1 { None } else { Some(value) }
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub(crate) fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_zero() {
        let ts = epoch_to_timestamp("atime", 0).unwrap();
        assert_eq!(ts.timestamp(), 0);
    }

    #[test]
    fn test_epoch_rejects_negative_and_huge() {
        assert!(epoch_to_timestamp("mtime", -5).is_err());
        assert!(epoch_to_timestamp("mtime", i64::MAX).is_err());
    }

    #[test]
    fn test_sentinel() {
        assert_eq!(sentinel_to_option(-1), None);
        assert_eq!(sentinel_to_option(0), Some(0));
        assert_eq!(sentinel_to_option(-7), Some(-7));
        assert_eq!(sentinel_to_option(1311), Some(1311));
    }

    #[test]
    fn test_flags() {
        assert!(!flag_to_bool(0));
        assert!(flag_to_bool(1));
        assert!(flag_to_bool(-3));
        assert_eq!(format_bool(true), "True");
        assert_eq!(format_bool(false), "False");
    }
}
