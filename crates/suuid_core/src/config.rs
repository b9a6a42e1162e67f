//! The suuid rc file.
//!
//! Plain `key = value` lines. Blank lines and `#` comments are skipped and
//! unknown keys are ignored. A missing file is the same as an empty one.

use crate::error::{Result, SuuidError};
use crate::uuid_codec::NodeId;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Default rc file name, relative to the home directory.
pub const RC_FILE_NAME: &str = ".suuidrc";

/// Resolved rc configuration, read once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Host name override (`hostname`).
    pub hostname: Option<String>,

    /// External UUID command (`uuidcmd`). Kept so existing rc files still
    /// load; generation always happens in-process.
    pub uuid_cmd: Option<String>,

    /// Node field override (`macaddr`).
    pub macaddr: Option<NodeId>,
}

impl Config {
    /// Loads the rc file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but can't be read, or if a
    /// recognized key has an invalid value.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loading rc file");
                Self::parse(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(SuuidError::ConfigError(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parses rc file content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Config::default();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                debug!(line = lineno + 1, "skipping rc line without '='");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "hostname" => config.hostname = non_empty(value),
                "uuidcmd" => {
                    warn!(value = value, "uuidcmd is ignored, UUIDs are generated internally");
                    config.uuid_cmd = non_empty(value);
                }
                "macaddr" => {
                    config.macaddr = match non_empty(value) {
                        Some(v) => Some(v.parse().map_err(|_| {
                            SuuidError::ConfigError(format!(
                                "line {}: invalid macaddr '{}'",
                                lineno + 1,
                                value
                            ))
                        })?),
                        None => None,
                    }
                }
                other => debug!(key = other, "ignoring unknown rc key"),
            }
        }

        Ok(config)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
