//! Generate, log and print UUIDs.

use crate::comment::{read_comment, split_tags};
use crate::context;
use crate::signals;
use crate::GenArgs;
use anyhow::{bail, Context, Result};
use console::style;
use std::fs;
use std::path::Path;
use suuid_core::{create_and_log, NodeId, Outputs, RunRequest, UuidGenerator};
use tracing::debug;

/// Runs one generation with the given options.
pub fn run(args: GenArgs, rcfile: Option<&Path>) -> Result<()> {
    let config = context::load_config(rcfile)?;
    let hostname = context::hostname(&config)?;
    let outputs: Outputs = args.whereto.parse()?;

    let log_dir = context::log_dir(args.logdir.as_deref())?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let log_path = context::log_path(&log_dir, &hostname);

    let request = RunRequest {
        count: args.count,
        uuid: args.uuid,
        comment: read_comment(args.comment, args.editor)?,
        tags: split_tags(args.tags),
        raw: args.raw,
        context: context::entry_context(&hostname),
        sessions: context::sessions_from_env(),
        outputs,
    };

    let node = if args.random_mac {
        NodeId::random()
    } else {
        config
            .macaddr
            .or_else(NodeId::from_system)
            .unwrap_or_else(NodeId::random)
    };
    debug!(node = %node, log = %log_path.display(), "starting run");
    let mut generator = UuidGenerator::new(node);

    let cancel = signals::install();
    let result = create_and_log(
        &log_path,
        &request,
        &mut generator,
        &cancel,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(hint) = e.recovery_suggestion() {
                eprintln!("{} {}", style("hint:").for_stderr().cyan(), hint);
            }
            return Err(e).with_context(|| format!("Failed to log UUIDs to {}", log_path.display()));
        }
    };

    if summary.interrupted {
        bail!(
            "Interrupted: {} of {} UUIDs created",
            summary.produced(),
            summary.requested
        );
    }
    Ok(())
}
