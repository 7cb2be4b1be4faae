//! Strata CLI - declarative reconciliation engine
//!
//! Usage: strata <COMMAND>
//!
//! Commands:
//!   validate   Check a model file
//!   plan       Show what apply would change
//!   apply      Reconcile persisted state with a model file
//!   instances  List known instances
//!   status     Show an instance's status label
//!   resources  List an instance's persisted resources
//!   types      List registered component types

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, warnings) = commands::load_config(cli.config_file.as_deref())?;
    init_tracing(cli.verbose, config.log.level.as_deref());
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let rt = Runtime::new(config, cli.json, cli.verbose);

    match cli.command {
        Commands::Validate { file } => commands::validate::cmd_validate(&rt, &file),
        Commands::Plan { file } => commands::plan::cmd_plan(&rt, &file),
        Commands::Apply {
            file,
            dry_run,
            continue_on_error,
        } => commands::apply::cmd_apply(&rt, &file, dry_run, continue_on_error),
        Commands::Instances => commands::inspect::cmd_instances(&rt),
        Commands::Status { instance } => commands::inspect::cmd_status(&rt, &instance),
        Commands::Resources { instance } => commands::inspect::cmd_resources(&rt, &instance),
        Commands::Types => commands::inspect::cmd_types(&rt),
    }
}

/// Log filter precedence: STRATA_LOG, RUST_LOG, `-v` count, config level, `warn`.
fn init_tracing(verbose: u8, config_level: Option<&str>) {
    let directive = match verbose {
        0 => config_level.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("STRATA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time(),
        )
        .init();
}
