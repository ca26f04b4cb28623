mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::{DealArgs, SensitivityArgs};

/// Cross-border equipment lease economics
#[derive(Parser)]
#[command(
    name = "leasecalc",
    version,
    about = "Cross-border equipment lease economics",
    long_about = "Evaluate a cross-border heavy-machinery lease with decimal precision: \
                  cost breakdowns, gross margins, dual payback periods, IRR, compliance \
                  against business thresholds, reverse-solved thresholds, scenario \
                  comparison and sensitivity analysis."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine config file (JSON or YAML) overriding thresholds and solver settings
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a deal under its selected scenario
    Calculate(DealArgs),
    /// Evaluate a deal under every scenario
    Scenarios(DealArgs),
    /// Flex one input and track a target metric
    Sensitivity(SensitivityArgs),
    /// Reverse-solve the inputs at which the deal meets its targets
    Thresholds(DealArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let engine_config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let detailed = cli.output == OutputFormat::Json;

    let result: Result<output::Report, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::deal::run_calculate(args, &engine_config, detailed),
        Commands::Scenarios(args) => commands::deal::run_scenarios(args, &engine_config, detailed),
        Commands::Sensitivity(args) => commands::deal::run_sensitivity(args, &engine_config),
        Commands::Thresholds(args) => commands::deal::run_thresholds(args, &engine_config, detailed),
        Commands::Version => {
            println!("leasecalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result.and_then(|report| output::render(&cli.output, &report)) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
