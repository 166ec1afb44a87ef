mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::commission::{AgentCommissionArgs, CommissionArgs, ProjectionArgs};
use commands::schedule::{AllocationArgs, ScheduleArgs};

/// Microfinance loan commission and payment schedule calculations
#[derive(Parser)]
#[command(
    name = "mfe",
    version,
    about = "Microfinance loan commission and payment schedule calculations",
    long_about = "A CLI for microfinance back-office calculations with decimal precision. \
                  Supports tiered loan commission with agent/institution split, commission \
                  projection, agent period totals, flat-interest payment schedules and \
                  payment allocation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Commission rate card override (JSON or YAML file)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the commission on a loan and its agent/institution split
    Commission(CommissionArgs),
    /// Project an agent's commission over a term in months
    ProjectCommission(ProjectionArgs),
    /// Total an agent's commission over loans disbursed in a period
    AgentCommissions(AgentCommissionArgs),
    /// Generate a flat-interest payment schedule
    Schedule(ScheduleArgs),
    /// Allocate payments received against a loan's schedule
    AllocatePayment(AllocationArgs),
    /// Show the effective commission rate card
    Tiers,
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

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> =
        input::config::load_commission_config(cli.config.as_deref()).and_then(|config| {
            match cli.command {
                Commands::Commission(args) => commands::commission::run_commission(args, config),
                Commands::ProjectCommission(args) => {
                    commands::commission::run_projection(args, config)
                }
                Commands::AgentCommissions(args) => {
                    commands::commission::run_agent_commissions(args, config)
                }
                Commands::Schedule(args) => commands::schedule::run_schedule(args),
                Commands::AllocatePayment(args) => commands::schedule::run_allocation(args),
                Commands::Tiers => commands::commission::run_tiers(config),
                Commands::Version => {
                    println!("mfe {}", env!("CARGO_PKG_VERSION"));
                    process::exit(0);
                }
            }
        });

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
