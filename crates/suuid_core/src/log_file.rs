//! Append-only XML log shared between suuid processes.
//!
//! While no writer holds the lock, a log file is exactly:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE suuids SYSTEM "dtd/suuids.dtd">
//! <suuids>
//! <suuid ...> ... </suuid>       (zero or more, one per line)
//! </suuids>
//! ```
//!
//! A writer locks the file, positions itself on the closing marker,
//! overwrites it with new entries and writes the marker back on close.

use crate::entry::Entry;
use crate::error::{Result, SuuidError};
use fs2::FileExt;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Written to a new, empty log file.
pub const LOG_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                              <!DOCTYPE suuids SYSTEM \"dtd/suuids.dtd\">\n\
                              <suuids>\n";

/// Last bytes of a well-formed log file.
pub const CLOSING_MARKER: &str = "</suuids>\n";

const MARKER_LEN: u64 = CLOSING_MARKER.len() as u64;

/// Lifecycle of a [`LogFile`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogState {
    /// Open and exclusively locked; the file has not been touched.
    Locked,
    /// Tail inspected; the write cursor sits where the marker was.
    Repaired,
    /// At least one entry written since the repair.
    Appended,
    /// A write failed and the marker was put back; only close is allowed.
    Sealed,
    /// Marker written, lock released.
    Closed,
}

impl fmt::Display for LogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Locked => "locked",
            Self::Repaired => "repaired",
            Self::Appended => "appended",
            Self::Sealed => "sealed",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// What `repair_tail` found at the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailStatus {
    /// The file was empty; the header was written.
    NewFile,
    /// The closing marker was found and will be overwritten.
    Marker,
    /// The file is too short to hold a marker; appending at the end.
    ShortTail,
    /// The tail is not the closing marker; appending at the end.
    UnknownTail,
}

/// Exclusively locked handle on a log file.
///
/// The handle must be closed with [`LogFile::close`]. If it is dropped
/// instead, the marker is restored and the lock released on a best-effort
/// basis.
///
/// # Examples
///
/// ```
/// use suuid_core::{Entry, LogFile, CLOSING_MARKER, LOG_HEADER};
/// use tempfile::TempDir;
///
/// let tmp = TempDir::new().unwrap();
/// let path = tmp.path().join("host.xml");
///
/// let mut entry = Entry::new();
/// entry.set_uuid("d3de2000-4695-11e6-8000-000000000000").unwrap();
///
/// let mut log = LogFile::open_for_append(&path).unwrap();
/// log.append(&entry, false).unwrap();
/// log.close().unwrap();
///
/// let content = std::fs::read_to_string(&path).unwrap();
/// assert!(content.starts_with(LOG_HEADER));
/// assert!(content.ends_with(CLOSING_MARKER));
/// ```
pub struct LogFile {
    path: PathBuf,
    /// None once closed.
    file: Option<File>,
    state: LogState,
    entries_written: usize,
}

impl LogFile {
    /// Opens or creates the log file and takes an exclusive lock on it.
    ///
    /// Blocks until any other holder of the lock releases it. The file is
    /// opened read-write with create in one call, so two first writers can
    /// never both see a missing file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| SuuidError::log_io(&path, e))?;

        debug!(path = %path.display(), "waiting for exclusive lock");
        FileExt::lock_exclusive(&file).map_err(|e| SuuidError::log_io(&path, e))?;
        debug!(path = %path.display(), "lock acquired");

        Ok(Self {
            path,
            file: Some(file),
            state: LogState::Locked,
            entries_written: 0,
        })
    }

    /// Opens the log file and repairs its tail, ready for `append`.
    pub fn open_for_append(path: impl AsRef<Path>) -> Result<Self> {
        let mut log = Self::open(path)?;
        log.repair_tail()?;
        Ok(log)
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> LogState {
        self.state
    }

    /// Returns how many entries this handle has written.
    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// Inspects the end of the file and positions the write cursor.
    ///
    /// An empty file gets the header. If the file ends with the closing
    /// marker the cursor is placed on it so the next write replaces it. Any
    /// other tail is left intact and writing continues at the end.
    pub fn repair_tail(&mut self) -> Result<TailStatus> {
        if self.state != LogState::Locked {
            return Err(self.invalid_state("repair"));
        }
        let path = &self.path;
        let file = self.file.as_mut().ok_or_else(|| SuuidError::InvalidLogState {
            operation: "repair",
            state: LogState::Closed.to_string(),
        })?;
        let io = |e| SuuidError::log_io(path, e);

        let len = file.metadata().map_err(io)?.len();
        let status = if len == 0 {
            file.seek(SeekFrom::Start(0)).map_err(io)?;
            file.write_all(LOG_HEADER.as_bytes()).map_err(io)?;
            TailStatus::NewFile
        } else if len <= MARKER_LEN {
            warn!(
                path = %path.display(),
                len = len,
                "log file too short for a closing marker, appending at end"
            );
            file.seek(SeekFrom::End(0)).map_err(io)?;
            TailStatus::ShortTail
        } else {
            let mut tail = [0u8; MARKER_LEN as usize];
            file.seek(SeekFrom::Start(len - MARKER_LEN)).map_err(io)?;
            file.read_exact(&mut tail).map_err(io)?;
            if tail == CLOSING_MARKER.as_bytes() {
                file.seek(SeekFrom::Start(len - MARKER_LEN)).map_err(io)?;
                TailStatus::Marker
            } else {
                warn!(
                    path = %path.display(),
                    "log file does not end with {:?}, appending at end",
                    CLOSING_MARKER
                );
                file.seek(SeekFrom::End(0)).map_err(io)?;
                TailStatus::UnknownTail
            }
        };

        debug!(path = %path.display(), status = ?status, "tail repaired");
        self.state = LogState::Repaired;
        Ok(status)
    }

    /// Writes one entry and a newline at the cursor.
    ///
    /// The record is built in memory first and written with a single call.
    /// If the write fails, the partial record is cut off and the closing
    /// marker is put back before the error is returned.
    pub fn append(&mut self, entry: &Entry, raw: bool) -> Result<()> {
        if !matches!(self.state, LogState::Repaired | LogState::Appended) {
            return Err(self.invalid_state("append"));
        }
        let mut record = entry.serialize(raw)?;
        record.push('\n');

        let path = &self.path;
        let file = self.file.as_mut().ok_or_else(|| SuuidError::InvalidLogState {
            operation: "append",
            state: LogState::Closed.to_string(),
        })?;
        let start = file
            .stream_position()
            .map_err(|e| SuuidError::log_io(path, e))?;

        if let Err(e) = file.write_all(record.as_bytes()) {
            self.seal_at(start);
            return Err(SuuidError::log_io(&self.path, e));
        }

        self.state = LogState::Appended;
        self.entries_written += 1;
        Ok(())
    }

    /// Writes the closing marker, syncs, and releases the lock.
    pub fn close(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        let needs_marker = matches!(self.state, LogState::Repaired | LogState::Appended);

        let written = (|| -> std::io::Result<()> {
            if needs_marker {
                file.write_all(CLOSING_MARKER.as_bytes())?;
            }
            file.flush()?;
            file.sync_all()
        })();
        let unlocked = FileExt::unlock(&file);
        self.state = LogState::Closed;

        written.map_err(|e| SuuidError::log_io(&self.path, e))?;
        unlocked.map_err(|e| SuuidError::log_io(&self.path, e))?;
        debug!(
            path = %self.path.display(),
            entries = self.entries_written,
            "log closed"
        );
        Ok(())
    }

    /// Cuts off a partial record starting at `start` and puts the marker
    /// back. Only `close` is allowed afterwards.
    fn seal_at(&mut self, start: u64) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        match restore_marker(file, start) {
            Ok(()) => self.state = LogState::Sealed,
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to restore closing marker"
            ),
        }
    }

    fn invalid_state(&self, operation: &'static str) -> SuuidError {
        SuuidError::InvalidLogState {
            operation,
            state: self.state.to_string(),
        }
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        if self.file.is_none() {
            return;
        }
        warn!(path = %self.path.display(), "log file dropped without close");
        if let Err(e) = self.finish() {
            warn!(path = %self.path.display(), error = %e, "best-effort close failed");
        }
    }
}

/// Puts the marker back at `pos` and cuts off anything after it.
fn restore_marker(file: &mut File, pos: u64) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(pos))?;
    file.write_all(CLOSING_MARKER.as_bytes())?;
    file.set_len(pos + MARKER_LEN)?;
    file.flush()
}
