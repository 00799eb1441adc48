use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sigrule_core::ValueType;

/// Validate signal readings against a persisted rule set.
///
/// File paths default to the `RULES_FILE` / `READINGS_FILE` environment
/// configuration (optionally profiled via `SIGRULE_PROFILE`).
#[derive(Parser, Debug)]
#[command(name = "sigrule", version, about = "Validate signal readings against persisted rules")]
pub struct CliArgs {
    /// Rule snapshot file (JSON, or YAML by extension)
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a reading stream and report failures
    Validate(ValidateArgs),
    /// Add a rule and save the snapshot
    Add(AddArgs),
    /// Remove every rule and save the empty snapshot
    Clear,
    /// Print every rule in snapshot order
    List,
    /// Print the operators a value type accepts
    Operators {
        /// String, Integer or Datetime
        value_type: ValueType,
    },
    /// Re-validate the reading stream whenever it or the rules change
    Watch {
        /// Reading stream file
        #[arg(long)]
        readings: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Reading stream file
    #[arg(long)]
    pub readings: Option<PathBuf>,

    /// Stop at the first failed check
    #[arg(long)]
    pub raise: bool,

    /// Validate readings on all cores (ignored with --raise)
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Signal identifier, e.g. ATL5
    #[arg(long)]
    pub signal: String,

    /// String, Integer or Datetime
    #[arg(long = "type")]
    pub value_type: ValueType,

    /// Operator symbol (`<`, `nif`, ...) or menu label (`LessThan`, `NotInFuture`, ...)
    #[arg(long)]
    pub operator: String,

    /// Expected value; not used by NotInPast/NotInFuture
    #[arg(long)]
    pub value: Option<String>,
}
