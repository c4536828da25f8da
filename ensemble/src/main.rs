use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use common::config::Config;
use common::logger::init_logger;
use ensemble::best_model::{find_best_model_per_task, trial_directories};
use ensemble::dispatch::parse_test_logs;
use ensemble::instance::instance_id_from_path;
use ensemble::new_tests::{check_new_test_cases, load_new_test_cases};
use ensemble::pass_rate::{average_pass_rate, pass_rates_for_dir};
use ensemble::predictions::assemble_ensemble;
use ensemble::report::save_json;
use log::debug;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Aggregate model-trial test results and build an ensemble of winning patches")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-instance pass rates for one trial directory
    PassRates {
        /// Trial directory: one subdirectory per instance id
        dir: PathBuf,
        /// Output JSON path
        #[arg(long, default_value = "task_pass_rates.json")]
        out: PathBuf,
    },
    /// Report whether the newly-added tests of one instance passed
    CheckNewTests {
        /// Instance directory containing the raw test log
        dir: PathBuf,
        /// JSON file mapping instance id to its new test names
        #[arg(long, default_value = "added_test_cases.json")]
        new_tests: PathBuf,
    },
    /// Select the best trial per task and assemble the ensemble predictions
    Best {
        /// Root directory: one subdirectory per trial
        dir: PathBuf,
        /// Directory holding each trial's prediction store (<trial>/all_preds.jsonl)
        #[arg(long)]
        predictions: PathBuf,
        /// Directory for top_models.json and the ensemble all_preds.jsonl
        #[arg(long, default_value = "ensemble_model")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    Config::init(".env");
    let config = Config::get();
    init_logger(&config.log_level, config.log_file.as_deref());

    let cli = Cli::parse();
    match cli.command {
        Command::PassRates { dir, out } => run_pass_rates(&dir, &out),
        Command::CheckNewTests { dir, new_tests } => run_check_new_tests(&dir, &new_tests),
        Command::Best {
            dir,
            predictions,
            out_dir,
        } => run_best(&dir, &predictions, &out_dir),
    }
}

fn run_pass_rates(dir: &Path, out: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("Directory not found: {}", dir.display());
    }

    let results = pass_rates_for_dir(dir)?;
    if results.is_empty() {
        println!("No test results found.");
        return Ok(());
    }

    println!("\nOverall Summary:");
    println!("Total tasks: {}", results.len());
    println!(
        "Average pass rate: {:.2}%",
        average_pass_rate(&results) * 100.0
    );

    save_json(&results, out)?;
    println!("\nResults saved to {}", out.display());
    Ok(())
}

fn run_check_new_tests(dir: &Path, new_tests_path: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("Directory not found: {}", dir.display());
    }

    // The new-test-case file is the one fatal input.
    let new_test_cases = load_new_test_cases(new_tests_path)
        .with_context(|| format!("Cannot load {}", new_tests_path.display()))?;

    let instance_id = instance_id_from_path(dir);
    let test_results = match parse_test_logs(dir) {
        Ok(results) => results,
        Err(e) => {
            println!("No test results found for {instance_id}: {e}");
            return Ok(());
        }
    };

    let report = match check_new_test_cases(&instance_id, &test_results, &new_test_cases) {
        Ok(report) => report,
        Err(e) => {
            println!("Error checking new test cases for {instance_id}: {e}");
            return Ok(());
        }
    };

    println!("\nResults for new test cases in {instance_id}:");
    println!("{}", "-".repeat(60));

    let listed = new_test_cases
        .get(&instance_id)
        .map(|cases| cases.len())
        .unwrap_or(0);
    if listed == 0 {
        println!("No new test cases defined for {instance_id}");
        return Ok(());
    }
    println!("Total new test cases: {listed}");

    if report.passed.is_empty() {
        println!("\nNo test cases passed.");
    } else {
        println!("\nPassed test cases ({}):", report.passed.len());
        for test in &report.passed {
            println!("  ✅ {test}");
        }
    }

    if report.failed.is_empty() {
        println!("\nNo test cases failed.");
    } else {
        println!("\nFailed test cases ({}):", report.failed.len());
        for (test, reason) in &report.failed {
            println!("  ❌ {test} ({reason})");
        }
    }

    Ok(())
}

fn run_best(root: &Path, predictions_root: &Path, out_dir: &Path) -> Result<()> {
    if !root.is_dir() {
        bail!("Directory not found: {}", root.display());
    }

    let trial_dirs = trial_directories(root)?;
    if trial_dirs.is_empty() {
        bail!("No trial directories found in {}", root.display());
    }

    let outcome = find_best_model_per_task(&trial_dirs);
    debug!(
        "Compared {} trials across {} tasks",
        trial_dirs.len(),
        outcome.all_results.len()
    );

    println!("\nBest Models Per Task:");
    for (task_id, info) in &outcome.best_models {
        println!(
            "{task_id}: {} ({:.2}% - {}/{} tests)",
            info.model,
            info.pass_rate * 100.0,
            info.pass_count,
            info.total_count
        );
    }

    let best_models_path = out_dir.join("top_models.json");
    save_json(&outcome.best_models, &best_models_path)?;
    println!("\nResults saved to {}", best_models_path.display());

    let ensemble_path = out_dir.join("all_preds.jsonl");
    let written = assemble_ensemble(&outcome.best_models, predictions_root, &ensemble_path)?;
    println!(
        "Wrote {written} ensemble prediction(s) to {}",
        ensemble_path.display()
    );

    Ok(())
}
