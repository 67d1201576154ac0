//! `tree-trace` — run an insert/delete script and print the action traces.
//!
//! Usage:
//!   tree-trace [--variant bst|avl|red-black] [--config FILE] [--pretty] < script
//!
//! One JSON object per command is written to stdout. Logs go to stderr and
//! are controlled by `RUST_LOG`.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tree_trace::cli::{run_script, CliError};
use tree_trace::{TraceConfig, Tree, Variant};

#[derive(Debug, Parser)]
#[command(name = "tree-trace", about = "Trace BST, AVL and red-black tree operations")]
struct Args {
    /// Tree engine; overrides the config file.
    #[arg(long, value_enum)]
    variant: Option<Variant>,
    /// JSON trace config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pretty-print each JSON object.
    #[arg(long)]
    pretty: bool,
}

fn run(args: Args) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => TraceConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => TraceConfig::default(),
    };
    if let Some(variant) = args.variant {
        config.variant = variant;
    }

    let mut script = String::new();
    io::stdin().read_to_string(&mut script)?;

    let mut tree = Tree::with_config(config.variant, config);
    let results = run_script(&mut tree, &script)?;

    let mut out = io::stdout().lock();
    for value in results {
        let line = if args.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
