//! Resolution of configuration, log location and entry context from the
//! process environment.

use anyhow::{Context, Result};
use std::env;
use std::os::fd::AsFd;
use std::path::{Path, PathBuf};
use suuid_core::{parse_sessions, Config, EntryContext, SessionLink, RC_FILE_NAME, SESSION_ENV};
use tracing::{debug, warn};

/// Overrides the host name used for the log file and entries.
pub const HOSTNAME_ENV: &str = "SUUID_HOSTNAME";

/// Overrides the log directory.
pub const LOGDIR_ENV: &str = "SUUID_LOGDIR";

/// Location of the rc file: `--rcfile` or `~/.suuidrc`.
pub fn rc_path(rcfile: Option<&Path>) -> Option<PathBuf> {
    match rcfile {
        Some(path) => Some(path.to_path_buf()),
        None => dirs::home_dir().map(|home| home.join(RC_FILE_NAME)),
    }
}

/// Loads the rc file, or the defaults if there is none.
pub fn load_config(rcfile: Option<&Path>) -> Result<Config> {
    match rc_path(rcfile) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Host name from `SUUID_HOSTNAME`, the rc file, or the system.
pub fn hostname(config: &Config) -> Result<String> {
    if let Some(host) = env::var(HOSTNAME_ENV).ok().filter(|h| !h.is_empty()) {
        return Ok(host);
    }
    if let Some(ref host) = config.hostname {
        return Ok(host.clone());
    }
    let host = nix::unistd::gethostname().context("Failed to get host name")?;
    host.into_string()
        .map_err(|_| anyhow::anyhow!("Host name is not valid UTF-8; set {}", HOSTNAME_ENV))
}

/// Log directory from `--logdir`, `SUUID_LOGDIR`, or `~/uuids`.
pub fn log_dir(arg: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = arg {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env::var_os(LOGDIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join("uuids"))
        .with_context(|| format!("No home directory; set {} or use --logdir", LOGDIR_ENV))
}

/// `<dir>/<hostname>.xml`
pub fn log_path(dir: &Path, hostname: &str) -> PathBuf {
    dir.join(format!("{}.xml", hostname))
}

/// Host, working directory, user and terminal of this process.
pub fn entry_context(hostname: &str) -> EntryContext {
    let cwd = env::current_dir()
        .ok()
        .and_then(|p| utf8_path("cwd", p));

    let user = nix::unistd::User::from_uid(nix::unistd::getuid())
        .ok()
        .flatten()
        .map(|u| u.name)
        .or_else(|| env::var("USER").ok())
        .filter(|u| !u.is_empty());

    let tty = nix::unistd::ttyname(std::io::stdin().as_fd())
        .ok()
        .and_then(|p| utf8_path("tty", p));

    debug!(cwd = ?cwd, user = ?user, tty = ?tty, "entry context");
    EntryContext {
        host: Some(hostname.to_string()),
        cwd,
        user,
        tty,
    }
}

/// Non-UTF-8 paths are left out of the entry instead of being repaired.
fn utf8_path(field: &str, path: PathBuf) -> Option<String> {
    match path.into_os_string().into_string() {
        Ok(path) => Some(path),
        Err(raw) => {
            warn!(path = ?raw, "{} is not valid UTF-8, leaving it out of the entry", field);
            None
        }
    }
}

/// Session links from `SESS`, if set.
pub fn sessions_from_env() -> Vec<SessionLink> {
    env::var(SESSION_ENV)
        .map(|value| parse_sessions(&value))
        .unwrap_or_default()
}
