mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::affordability::{AffordArgs, MaxPrincipalArgs};
use commands::assess::AssessArgs;
use commands::policy::TermsArgs;
use commands::quote::{CompareArgs, OptionsArgs, QuoteArgs};

/// Installment financing calculations for the storefront
#[derive(Parser)]
#[command(
    name = "loanq",
    version,
    about = "Installment financing quotes, schedules and affordability checks",
    long_about = "A CLI for pricing storefront installment plans with decimal precision. \
                  Supports flat-rate and reducing-balance quotes, amortization schedules, \
                  salary affordability checks, maximum affordable price and loan \
                  application assessment."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a JSON or YAML financing policy (rates, ratio, allowed terms)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log calculation details to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a product price at one term under a chosen interest policy
    Quote(QuoteArgs),
    /// Test an installment against net salary
    Afford(AffordArgs),
    /// Largest price affordable on a given salary and term
    MaxPrincipal(MaxPrincipalArgs),
    /// Compare flat and reducing-balance quotes side by side
    Compare(CompareArgs),
    /// Installment options across every allowed term
    Options(OptionsArgs),
    /// Assess a device loan application
    Assess(AssessArgs),
    /// Show the financing policy in effect
    Terms(TermsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("loan_finance_core=debug,loanq=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = match input::config::load_policy(cli.config.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::quote::run_quote(args, policy),
        Commands::Afford(args) => commands::affordability::run_afford(args, policy),
        Commands::MaxPrincipal(args) => commands::affordability::run_max_principal(args, policy),
        Commands::Compare(args) => commands::quote::run_compare(args, policy),
        Commands::Options(args) => commands::quote::run_options(args, policy),
        Commands::Assess(args) => commands::assess::run_assess(args, policy),
        Commands::Terms(args) => commands::policy::run_terms(args, policy),
        Commands::Version => {
            println!("loanq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
