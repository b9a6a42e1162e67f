//! suuid core library
//!
//! Creates time-based (version 1) UUIDs and keeps a permanent, append-only
//! record of each one:
//! - Strict v1 UUID validation, generation and timestamp decoding
//! - UTF-8 validation and escaping of untrusted free text
//! - Log entries with tags, comment, host, directory, user, tty and sessions
//! - A lock-protected XML log shared safely between processes
//!
//! # Quick Start
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//! use suuid_core::{create_and_log, NodeId, RunRequest, UuidGenerator};
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let log_path = tmp.path().join("myhost.xml");
//!
//! let request = RunRequest {
//!     count: 2,
//!     comment: Some(b"release candidate".to_vec()),
//!     ..Default::default()
//! };
//! let mut generator = UuidGenerator::new(NodeId::random());
//! let cancel = AtomicBool::new(false);
//! let mut out = Vec::new();
//!
//! let summary = create_and_log(
//!     &log_path,
//!     &request,
//!     &mut generator,
//!     &cancel,
//!     &mut out,
//!     &mut std::io::sink(),
//! )
//! .unwrap();
//! assert_eq!(summary.produced(), 2);
//! ```
//!
//! # Features
//!
//! ## Timestamps
//!
//! The creation time of any v1 UUID can be recovered:
//!
//! ```
//! use suuid_core::{is_valid_timestamp, timestamp_of};
//!
//! let ts = timestamp_of("d3de2000-4695-11e6-8000-000000000000").unwrap();
//! assert_eq!(ts, "2016-07-10T12:00:00.0000000Z");
//! assert!(is_valid_timestamp(&ts, true));
//! ```
//!
//! ## Entries
//!
//! Absent fields are left out of the record instead of written empty:
//!
//! ```
//! use suuid_core::Entry;
//!
//! let mut entry = Entry::new();
//! entry.set_uuid("d3de2000-4695-11e6-8000-000000000000").unwrap();
//! let xml = entry.serialize(false).unwrap();
//! assert!(!xml.contains("<host>"));
//! ```

mod config;
mod entry;
mod error;
mod generate;
mod log_file;
mod sanitize;
mod session;
mod uuid_codec;

pub use config::{Config, RC_FILE_NAME};
pub use entry::{Entry, EntryContext, SessionLink, MAX_TAGS};
pub use error::{Result, SuuidError};
pub use generate::{create_and_log, Outputs, RunRequest, RunSummary};
pub use log_file::{LogFile, LogState, TailStatus, CLOSING_MARKER, LOG_HEADER};
pub use sanitize::{check_field, escape_for_log, is_loggable, is_well_formed_utf8};
pub use session::{parse_sessions, SESSION_ENV};
pub use uuid_codec::{
    find_uuid, is_valid_timestamp, is_valid_uuid, ticks_of, timestamp_of, uuid_from_parts,
    NodeId, UuidGenerator, GREGORIAN_UNIX_OFFSET, TIMESTAMP_LEN, UUID_LEN,
};

use std::time::Duration;

/// Time provider trait for testing.
///
/// Allows injecting a controlled clock into [`UuidGenerator`]. Returns the
/// time elapsed since the Unix epoch.
pub trait TimeProvider: Send + Sync {
    /// Returns the current time as a duration since 1970-01-01.
    fn now(&self) -> Duration;
}

impl<F> TimeProvider for F
where
    F: Fn() -> Duration + Send + Sync,
{
    fn now(&self) -> Duration {
        self()
    }
}
