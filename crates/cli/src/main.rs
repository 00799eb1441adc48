mod authoring;
mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sigrule_core::config::{load_dotenv, Config};
use sigrule_core::ValueType;
use sigrule_rules::snapshot::{read_readings_file, watch_file};
use sigrule_rules::{FailureMode, RuleStore, SnapshotWatcher, StreamValidator};
use tracing::{info, warn};

use crate::authoring::{operator_labels, prepare_rule};
use crate::cli::{AddArgs, CliArgs, Command, ValidateArgs};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let args = CliArgs::parse();
    let rules_path = args.rules.unwrap_or_else(|| config.rules.rules_file.clone());

    match args.command {
        Command::Validate(v) => {
            let store = open_store(&rules_path)?;
            let readings = v
                .readings
                .clone()
                .unwrap_or_else(|| config.rules.readings_file.clone());
            run_validate(&store, &readings, &v, &config)
        }
        Command::Add(a) => {
            let store = open_store(&rules_path)?;
            run_add(&store, &rules_path, &a)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Clear => {
            let store = open_store(&rules_path)?;
            store.clear();
            store
                .save_file(&rules_path)
                .with_context(|| format!("failed to write {}", rules_path.display()))?;
            println!("All rules cleared.");
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            let store = open_store(&rules_path)?;
            run_list(&store);
            Ok(ExitCode::SUCCESS)
        }
        Command::Operators { value_type } => {
            run_operators(value_type);
            Ok(ExitCode::SUCCESS)
        }
        Command::Watch { readings } => {
            let store = open_store(&rules_path)?;
            let readings = readings.unwrap_or_else(|| config.rules.readings_file.clone());
            run_watch(store, &rules_path, &readings)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load the rule snapshot, starting empty when the file does not exist yet.
fn open_store(path: &Path) -> Result<RuleStore> {
    let store = RuleStore::new();
    if path.exists() {
        store
            .load_file(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?;
    } else {
        info!(path = %path.display(), "no rule snapshot yet, starting empty");
    }
    Ok(store)
}

fn run_validate(
    store: &RuleStore,
    readings_path: &Path,
    args: &ValidateArgs,
    config: &Config,
) -> Result<ExitCode> {
    let readings = read_readings_file(readings_path)
        .with_context(|| format!("failed to read readings from {}", readings_path.display()))?;

    let raise = args.raise || config.rules.raise_on_error;
    let parallel = args.parallel || config.rules.parallel;
    if raise && parallel {
        warn!("parallel validation only collects failures, running sequentially");
    }

    let validator = StreamValidator::new(store);
    let outcome = if parallel && !raise {
        validator.validate_parallel(&readings)
    } else {
        validator.validate(&readings, FailureMode::from(raise))
    };

    match outcome {
        Ok(report) => {
            for failure in &report.failures {
                println!("{}", failure);
            }
            println!(
                "\n{} readings, {} skipped, {} checks, {} failures",
                report.readings,
                report.skipped,
                report.checks,
                report.failures.len()
            );
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(e) if e.is_validation() => {
            eprintln!("validation failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("failed to validate readings"),
    }
}

fn run_add(store: &RuleStore, rules_path: &Path, args: &AddArgs) -> Result<()> {
    let record = prepare_rule(
        &args.signal,
        args.value_type,
        &args.operator,
        args.value.as_deref(),
    )?;
    store.add_record(&record)?;
    store
        .save_file(rules_path)
        .with_context(|| format!("failed to write {}", rules_path.display()))?;
    println!(
        "New rule added: {} {} {} {}",
        record.signal_id,
        record.value_type,
        record.operator,
        record.test_data.to_raw()
    );
    Ok(())
}

fn run_list(store: &RuleStore) {
    let records = store.serialize();
    if records.is_empty() {
        println!("No rules.");
        return;
    }
    for record in records {
        println!(
            "{:<12} {:<9} {:<4} {}",
            record.signal_id,
            record.value_type,
            record.operator,
            record.test_data.to_raw()
        );
    }
}

fn run_operators(value_type: ValueType) {
    for (operator, label) in operator_labels(value_type) {
        println!("{:<4} {}", operator.symbol(), label);
    }
}

/// Block until interrupted, re-validating on every rules or readings change.
fn run_watch(store: RuleStore, rules_path: &Path, readings_path: &Path) -> Result<()> {
    let (tx, rx) = mpsc::channel::<()>();

    let rules_tx = tx.clone();
    let _rules_watcher = SnapshotWatcher::spawn_with(store.clone(), rules_path, move |_| {
        let _ = rules_tx.send(());
    })
    .with_context(|| format!("failed to watch {}", rules_path.display()))?;

    let _readings_watcher = watch_file(readings_path, move |_| {
        let _ = tx.send(());
    })
    .with_context(|| format!("failed to watch {}", readings_path.display()))?;

    let validator = StreamValidator::new(&store);
    println!("Watching {} and {} (Ctrl-C to stop)", rules_path.display(), readings_path.display());

    loop {
        match read_readings_file(readings_path)
            .and_then(|readings| validator.validate(&readings, FailureMode::Collect))
        {
            Ok(report) => {
                println!("\n== {} readings, {} failures", report.readings, report.failures.len());
                for failure in &report.failures {
                    println!("{}", failure);
                }
            }
            Err(e) => eprintln!("\n== cannot validate {}: {}", readings_path.display(), e),
        }

        if rx.recv().is_err() {
            return Ok(());
        }
        // Editors often emit several events per save.
        thread::sleep(Duration::from_millis(200));
        while rx.try_recv().is_ok() {}
    }
}
