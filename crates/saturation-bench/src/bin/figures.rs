//! CLI tool for building the sample-size figures.
//!
//! # Usage
//!
//! ```bash
//! # Closed-form figures only (seconds)
//! cargo run --bin figures -- theory
//!
//! # Monte Carlo overlays at the published sizes
//! cargo run --release --bin figures -- --preset full monte-carlo --output ./figures/
//!
//! # Everything, with a different seed and experiment count
//! cargo run --release --bin figures -- --seed 7 --experiments 500 all
//!
//! # Cross-check theory against simulation
//! cargo run --release --bin figures -- validate
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use saturation::CancelToken;
use saturation_bench::output::{to_markdown, write_all};
use saturation_bench::sweep::{FigureConfig, SweepMode, SweepRunner};
use saturation_bench::validation::validate;

/// Progress bar resolution.
const PROGRESS_STEPS: u64 = 1_000;

/// Sample-size figure builder
#[derive(Parser, Debug)]
#[command(name = "figures")]
#[command(about = "Build theory and Monte Carlo data for the sample-size figures")]
#[command(version)]
struct Args {
    /// Preset configuration: quick (~1min), full (~30min)
    #[arg(short, long, default_value = "quick", global = true)]
    preset: String,

    /// Output directory for CSV, JSON and markdown files
    #[arg(short, long, default_value = "figures", global = true)]
    output: PathBuf,

    /// Base seed (overrides preset)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Experiments per evaluation (overrides preset)
    #[arg(short, long, global = true)]
    experiments: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Closed-form figures 1 to 3
    Theory,
    /// Monte Carlo overlays of figures 1 to 3
    MonteCarlo,
    /// Figure 4: true missing mass against the Good–Turing band
    MissingMass,
    /// Every figure
    All,
    /// Check the closed forms against simulation
    Validate,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Parse preset
    let mut config = match args.preset.to_lowercase().as_str() {
        "quick" => FigureConfig::quick(),
        "full" => FigureConfig::full(),
        _ => {
            eprintln!("Unknown preset '{}'. Available: quick, full", args.preset);
            std::process::exit(1);
        }
    };

    // Apply custom overrides
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(experiments) = args.experiments {
        config.simulation.experiments = experiments;
    }
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let mode = match args.command {
        Command::Theory => SweepMode::Theory,
        Command::MonteCarlo => SweepMode::MonteCarlo,
        Command::MissingMass => SweepMode::MissingMass,
        Command::All => SweepMode::All,
        Command::Validate => {
            run_validation(&config);
            return;
        }
    };

    // Print configuration
    println!("=== Sample-Size Figures ===\n");
    println!("Configuration:");
    println!("  Preset: {}", config.preset.name());
    println!("  Population: {}", config.simulation.population);
    println!("  Experiments: {}", config.simulation.experiments);
    println!("  Seed: {}", config.simulation.seed);
    println!(
        "  Figures: {:?}",
        mode.figures().iter().map(|f| f.name()).collect::<Vec<_>>()
    );
    println!();

    let progress_bar = progress_bar();
    let mut last = 0;
    let results = SweepRunner::new().run(&config, mode, |progress, task| {
        let current = (progress * PROGRESS_STEPS as f64) as u64;
        if current > last {
            last = current;
            progress_bar.set_position(current);
        }
        progress_bar.set_message(task.to_string());
    });
    progress_bar.finish_with_message("Complete!");

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Sweep failed: {}", e);
            std::process::exit(1);
        }
    };
    println!("\nCompleted in {:.1}s\n", results.total_time.as_secs_f64());

    // Write outputs
    match write_all(&results, &args.output) {
        Ok(paths) => {
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Failed to write results: {}", e);
            std::process::exit(1);
        }
    }

    // Print summary
    println!("\n{}", to_markdown(&results));
}

fn run_validation(config: &FigureConfig) {
    println!("=== Theory vs Simulation ===\n");
    println!("  Preset: {}", config.preset.name());
    println!("  Experiments: {}", config.simulation.experiments);
    println!("  Confidence: {}%", config.fixed_confidence);
    println!();

    let progress_bar = progress_bar();
    let report = validate(config, &CancelToken::new(), |progress, task| {
        progress_bar.set_position((progress * PROGRESS_STEPS as f64) as u64);
        progress_bar.set_message(task.to_string());
    });
    progress_bar.finish_and_clear();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Validation failed: {}", e);
            std::process::exit(1);
        }
    };

    for check in &report.checks {
        let status = if check.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        println!(
            "{} {} (expected {}, observed {})",
            status, check.name, check.expected, check.observed
        );
    }

    println!(
        "\n{}/{} checks passed",
        report.passed_count(),
        report.checks.len()
    );
    if !report.all_passed() {
        std::process::exit(1);
    }
}

fn progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(PROGRESS_STEPS);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% ETA: {eta} | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    progress_bar
}
