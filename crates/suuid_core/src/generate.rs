//! One generation run: create UUIDs, log them, print them.

use crate::entry::{Entry, EntryContext, SessionLink};
use crate::error::{Result, SuuidError};
use crate::log_file::LogFile;
use crate::sanitize::{check_field, well_formed_str};
use crate::uuid_codec::{is_valid_uuid, UuidGenerator};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Streams that receive each generated UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outputs {
    /// Print to standard output.
    pub stdout: bool,
    /// Print to standard error.
    pub stderr: bool,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: false,
        }
    }
}

impl FromStr for Outputs {
    type Err = SuuidError;

    /// Parses a `--whereto` value made of `o` (stdout), `e` (stderr),
    /// `a` (both) and `n` (neither).
    fn from_str(s: &str) -> Result<Self> {
        let mut outputs = Outputs {
            stdout: false,
            stderr: false,
        };
        for c in s.chars() {
            match c {
                'o' => outputs.stdout = true,
                'e' => outputs.stderr = true,
                'a' => {
                    outputs.stdout = true;
                    outputs.stderr = true;
                }
                'n' => {}
                other => {
                    return Err(SuuidError::ConfigError(format!(
                        "invalid output destination '{}' (expected o, e, a or n)",
                        other
                    )))
                }
            }
        }
        Ok(outputs)
    }
}

/// Everything a run needs besides the log path and the generator.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Number of UUIDs to create.
    pub count: usize,
    /// Log this UUID instead of generating; forces a single entry.
    pub uuid: Option<String>,
    /// Comment bytes as received from the user.
    pub comment: Option<Vec<u8>>,
    /// Tag bytes as received from the user.
    pub tags: Vec<Vec<u8>>,
    /// Embed the comment without escaping.
    pub raw: bool,
    /// Host, working directory, user and tty.
    pub context: EntryContext,
    /// Session links to attach to every entry.
    pub sessions: Vec<SessionLink>,
    /// Where to print the UUIDs.
    pub outputs: Outputs,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            count: 1,
            uuid: None,
            comment: None,
            tags: Vec::new(),
            raw: false,
            context: EntryContext::default(),
            sessions: Vec::new(),
            outputs: Outputs::default(),
        }
    }
}

impl RunRequest {
    /// Number of entries the run will try to write.
    pub fn effective_count(&self) -> usize {
        if self.uuid.is_some() {
            1
        } else {
            self.count
        }
    }

    /// Builds the entry shared by every UUID of the run.
    ///
    /// All user input is checked here, before the log is opened.
    pub fn template(&self) -> Result<Entry> {
        let mut entry = Entry::new();

        for tag in &self.tags {
            let tag = check_field("tag", tag)?;
            if !tag.is_empty() {
                entry.add_tag(tag.as_bytes())?;
            }
        }

        if let Some(ref comment) = self.comment {
            let text = if self.raw {
                well_formed_str(comment).ok_or(SuuidError::InvalidUtf8 { field: "comment" })?
            } else {
                check_field("comment", comment)?
            };
            entry.set_text(text);
        }

        entry.set_context(self.context.clone());
        for session in &self.sessions {
            entry.add_session(&session.uuid, session.desc.as_deref());
        }
        Ok(entry)
    }
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of UUIDs the run tried to create.
    pub requested: usize,
    /// UUIDs written to the log, in order.
    pub uuids: Vec<String>,
    /// The run stopped early because cancellation was requested.
    pub interrupted: bool,
}

impl RunSummary {
    /// Number of UUIDs written to the log.
    pub fn produced(&self) -> usize {
        self.uuids.len()
    }

    /// True if every requested UUID was produced.
    pub fn is_complete(&self) -> bool {
        self.produced() == self.requested
    }
}

/// Creates and logs the UUIDs described by `request`.
///
/// `cancel` is checked before each entry; once it is set the run stops
/// with the entries written so far and the log is closed normally. Input
/// validation fails before the log is touched. Any later error closes the
/// log and is returned as `RunFailed` with the number of UUIDs produced.
pub fn create_and_log(
    log_path: &Path,
    request: &RunRequest,
    generator: &mut UuidGenerator,
    cancel: &AtomicBool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<RunSummary> {
    let template = request.template()?;
    if let Some(ref uuid) = request.uuid {
        if !is_valid_uuid(uuid, true) {
            return Err(SuuidError::InvalidUuid(uuid.clone()));
        }
    }

    let requested = request.effective_count();
    let mut summary = RunSummary {
        requested,
        uuids: Vec::with_capacity(requested),
        interrupted: false,
    };
    if requested == 0 {
        return Ok(summary);
    }

    let mut log = LogFile::open_for_append(log_path)?;
    let written = write_entries(
        &mut log,
        &template,
        request,
        generator,
        cancel,
        Sinks { out, err },
        &mut summary,
    );
    let closed = log.close();

    match written.and(closed) {
        Ok(()) => {
            if summary.interrupted {
                warn!(
                    produced = summary.produced(),
                    requested = requested,
                    "run interrupted"
                );
            }
            info!(
                path = %log_path.display(),
                count = summary.produced(),
                "logged UUIDs"
            );
            Ok(summary)
        }
        Err(e) => Err(SuuidError::RunFailed {
            produced: summary.produced(),
            requested,
            source: Box::new(e),
        }),
    }
}

struct Sinks<'o, 'e> {
    out: &'o mut dyn Write,
    err: &'e mut dyn Write,
}

impl Sinks<'_, '_> {
    fn emit(&mut self, outputs: Outputs, uuid: &str) -> std::io::Result<()> {
        if outputs.stdout {
            writeln!(self.out, "{}", uuid)?;
            self.out.flush()?;
        }
        if outputs.stderr {
            writeln!(self.err, "{}", uuid)?;
            self.err.flush()?;
        }
        Ok(())
    }
}

fn write_entries(
    log: &mut LogFile,
    template: &Entry,
    request: &RunRequest,
    generator: &mut UuidGenerator,
    cancel: &AtomicBool,
    mut sinks: Sinks<'_, '_>,
    summary: &mut RunSummary,
) -> Result<()> {
    for _ in 0..summary.requested {
        if cancel.load(Ordering::SeqCst) {
            summary.interrupted = true;
            break;
        }

        let uuid = match request.uuid {
            Some(ref uuid) => uuid.clone(),
            None => generator.generate(),
        };
        let mut entry = template.clone();
        entry.set_uuid(&uuid)?;
        log.append(&entry, request.raw)?;
        debug!(uuid = %uuid, "entry appended");
        // Logged entries count as produced even if printing fails.
        summary.uuids.push(uuid.clone());
        sinks.emit(request.outputs, &uuid)?;
    }
    Ok(())
}
