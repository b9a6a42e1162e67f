//! Show the resolved configuration.

use crate::context;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Prints where configuration and log data come from.
pub fn run(rcfile: Option<&Path>) -> Result<()> {
    let config = context::load_config(rcfile)?;
    let hostname = context::hostname(&config)?;
    let log_dir = context::log_dir(None)?;

    match context::rc_path(rcfile) {
        Some(path) if path.exists() => println!("rc file:   {}", path.display()),
        Some(path) => println!("rc file:   {} {}", path.display(), style("(not present)").dim()),
        None => println!("rc file:   (no home directory)"),
    }
    println!("hostname:  {}", hostname);
    if let Some(ref mac) = config.macaddr {
        println!("macaddr:   {}", mac);
    }
    if let Some(ref cmd) = config.uuid_cmd {
        println!("uuidcmd:   {} {}", cmd, style("(ignored)").yellow());
    }
    println!("log file:  {}", context::log_path(&log_dir, &hostname).display());

    Ok(())
}
