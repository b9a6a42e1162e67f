use anyhow::{bail, ensure, Result};
use std::collections::HashSet;
use suuid_core::{find_uuid, is_valid_timestamp, CLOSING_MARKER, LOG_HEADER, TIMESTAMP_LEN};

/// Checks that can be made against the log and the last run
#[derive(Debug, Clone)]
pub enum Assertion {
    /// Header once at the start, marker once at the end, entries between
    WellFormed,
    /// Exactly this many entries
    EntryCount(usize),
    /// No UUID is logged twice
    UuidsUnique,
    /// Entry timestamps strictly increase in file order
    TimestampsIncreasing,
    /// The log contains this text
    LogContains(String),
    /// An entry for this UUID exists
    HasEntryFor(String),
    /// Result of the most recent run
    LastRun { produced: usize, interrupted: bool },
}

/// Structural checks on the content of a log file
pub struct LogAssertions<'a> {
    content: &'a str,
}

impl<'a> LogAssertions<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    /// Header once at the start, marker once at the end, one entry per
    /// line in between.
    pub fn well_formed(&self) -> Result<&Self> {
        ensure!(
            self.content.starts_with(LOG_HEADER),
            "log does not start with the header"
        );
        ensure!(
            self.content.ends_with(CLOSING_MARKER),
            "log does not end with the closing marker"
        );
        ensure!(
            self.content.matches("<suuids>").count() == 1,
            "header appears more than once"
        );
        ensure!(
            self.content.matches(CLOSING_MARKER).count() == 1,
            "closing marker appears more than once"
        );
        for line in self.entry_lines() {
            if !(line.starts_with("<suuid t=\"") && line.ends_with(" </suuid>")) {
                bail!("malformed entry line: {}", line);
            }
        }
        Ok(self)
    }

    /// Exactly `n` entries
    pub fn entry_count(&self, n: usize) -> Result<&Self> {
        let found = self.entry_lines().len();
        ensure!(found == n, "expected {} entries, found {}", n, found);
        Ok(self)
    }

    /// No UUID appears in two entries
    pub fn uuids_unique(&self) -> Result<&Self> {
        let uuids = self.uuids();
        let distinct: HashSet<_> = uuids.iter().collect();
        ensure!(
            distinct.len() == uuids.len(),
            "{} duplicate UUIDs in log",
            uuids.len() - distinct.len()
        );
        Ok(self)
    }

    /// Timestamps strictly increase from entry to entry
    pub fn timestamps_increasing(&self) -> Result<&Self> {
        let stamps = self.timestamps();
        for pair in stamps.windows(2) {
            ensure!(
                pair[0] < pair[1],
                "timestamp {} is not after {}",
                pair[1],
                pair[0]
            );
        }
        Ok(self)
    }

    /// Lines between the header and the closing marker
    pub fn entry_lines(&self) -> Vec<&'a str> {
        let body = self
            .content
            .strip_prefix(LOG_HEADER)
            .unwrap_or(self.content);
        let body = body.strip_suffix(CLOSING_MARKER).unwrap_or(body);
        body.lines().collect()
    }

    /// UUID of every entry, in file order
    pub fn uuids(&self) -> Vec<&'a str> {
        self.entry_lines()
            .into_iter()
            .filter_map(|line| line.split_once(" u=\"").map(|(_, rest)| rest))
            .filter_map(find_uuid)
            .collect()
    }

    /// Timestamp of every entry, in file order
    pub fn timestamps(&self) -> Vec<&'a str> {
        self.entry_lines()
            .into_iter()
            .filter_map(|line| line.strip_prefix("<suuid t=\""))
            .filter(|rest| is_valid_timestamp(rest, false))
            .map(|rest| &rest[..TIMESTAMP_LEN])
            .collect()
    }
}
