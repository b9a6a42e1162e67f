//! suuid CLI - generate UUIDs and log where they were made.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

mod comment;
mod commands;
mod context;
mod signals;

#[derive(Parser)]
#[command(name = "suuid")]
#[command(about = "Generate time-based UUIDs and log where they were made", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Read configuration from this file instead of ~/.suuidrc
    #[arg(long, global = true, value_name = "PATH")]
    rcfile: Option<PathBuf>,
    #[command(flatten)]
    generate: GenArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options for generating UUIDs (the default action).
#[derive(Args, Debug)]
pub struct GenArgs {
    /// Comment for the log entry; "-" reads it from stdin
    #[arg(short, long, allow_hyphen_values = true, conflicts_with = "editor")]
    pub comment: Option<OsString>,
    /// Write the comment in $EDITOR
    #[arg(short, long)]
    pub editor: bool,
    /// Number of UUIDs to generate
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,
    /// Tag the entry; repeat or separate with commas
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<OsString>,
    /// Log directory (default: $SUUID_LOGDIR or ~/uuids)
    #[arg(short, long, value_name = "DIR")]
    pub logdir: Option<PathBuf>,
    /// Use a random node instead of the hardware address
    #[arg(short = 'm', long)]
    pub random_mac: bool,
    /// Write the comment to the log without escaping
    #[arg(long)]
    pub raw: bool,
    /// Log this existing v1 UUID instead of generating one
    #[arg(short, long, value_name = "UUID")]
    pub uuid: Option<String>,
    /// Where to print UUIDs: o=stdout, e=stderr, a=both, n=nowhere
    #[arg(short, long, default_value = "o", value_name = "DEST")]
    pub whereto: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the creation time embedded in UUIDs
    Timestamp {
        /// v1 UUIDs
        #[arg(required = true)]
        uuids: Vec<String>,
    },
    /// Check that arguments are lowercase v1 UUIDs
    Validate {
        /// Strings to check
        #[arg(required = true)]
        uuids: Vec<String>,
    },
    /// Show the resolved configuration and log file
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let rcfile = cli.rcfile.as_deref();
    match cli.command {
        None => commands::generate::run(cli.generate, rcfile),
        Some(Commands::Timestamp { uuids }) => commands::timestamp::run(&uuids),
        Some(Commands::Validate { uuids }) => commands::validate::run(&uuids),
        Some(Commands::Config) => commands::config::run(rcfile),
    }
}
