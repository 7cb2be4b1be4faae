use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strata - declarative reconciliation engine
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to STRATA_CONFIG, ./strata.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a model file without touching any state
    Validate {
        /// Path to the model YAML file
        file: PathBuf,
    },

    /// Show what apply would change
    Plan {
        /// Path to the model YAML file
        file: PathBuf,
    },

    /// Reconcile persisted state with a model file
    Apply {
        /// Path to the model YAML file
        file: PathBuf,

        /// Dry run - count changes without writing
        #[arg(long)]
        dry_run: bool,

        /// Keep applying after a failed write instead of stopping
        #[arg(long)]
        continue_on_error: bool,
    },

    /// List known instances
    Instances,

    /// Show the status label of an instance
    Status {
        /// Instance id
        instance: String,
    },

    /// List the persisted resources of an instance
    Resources {
        /// Instance id
        instance: String,
    },

    /// List registered component types
    Types,
}
