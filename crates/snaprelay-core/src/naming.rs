//! Spool artifact naming.
//!
//! Frame file names are derived from the capture instant at second
//! granularity (`20260806_141523.jpg`), which keeps them unique within a
//! device session as long as captures are more than one second apart.

use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File name for a raw frame captured at `at`.
pub fn frame_file_name(at: DateTime<Utc>, extension: &str) -> String {
    format!("{}.{}", at.format(TIMESTAMP_FORMAT), extension)
}

/// File name for the transcoded artifact derived from `original`.
pub fn transcoded_file_name(original: &str) -> String {
    format!("compressed_{}", original)
}
