use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use microfin_core::commission::{
    self, AgentCommissionInput, CommissionConfig, CommissionInput, LoanRecord, ProjectionInput,
};

use crate::input;

/// Arguments for a single-loan commission calculation
#[derive(Args)]
pub struct CommissionArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub loan_amount: Option<Decimal>,
}

/// Arguments for a commission projection over a term
#[derive(Args)]
pub struct ProjectionArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub loan_amount: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,
}

/// Arguments for an agent's commission totals over a period
#[derive(Args)]
pub struct AgentCommissionArgs {
    /// Path to JSON input file with loans, period and optional config
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON array of loan records (used with the period flags)
    #[arg(long)]
    pub loans: Option<String>,

    /// First disbursement date counted (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub period_start: Option<NaiveDate>,

    /// Last disbursement date counted (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub period_end: Option<NaiveDate>,
}

pub fn run_commission(
    args: CommissionArgs,
    config: Option<CommissionConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut commission_input: CommissionInput = if let Some(ref path) = args.input {
        log::debug!("commission input from {path}");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CommissionInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            config: CommissionConfig::default(),
        }
    };
    if let Some(config) = config {
        commission_input.config = config;
    }

    let result = commission::analyze_commission(&commission_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_projection(
    args: ProjectionArgs,
    config: Option<CommissionConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut projection_input: ProjectionInput = if let Some(ref path) = args.input {
        log::debug!("projection input from {path}");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ProjectionInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            config: CommissionConfig::default(),
        }
    };
    if let Some(config) = config {
        projection_input.config = config;
    }

    let result = commission::analyze_projection(&projection_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_agent_commissions(
    args: AgentCommissionArgs,
    config: Option<CommissionConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut agent_input: AgentCommissionInput = if let Some(ref path) = args.input {
        log::debug!("agent commission input from {path}");
        input::file::read_json(path)?
    } else if let Some(ref path) = args.loans {
        let loans: Vec<LoanRecord> = input::file::read_json(path)?;
        log::debug!("{} loan record(s) from {path}", loans.len());
        AgentCommissionInput {
            loans,
            period_start: args
                .period_start
                .ok_or("--period-start is required with --loans")?,
            period_end: args
                .period_end
                .ok_or("--period-end is required with --loans")?,
            config: CommissionConfig::default(),
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json>, --loans <file.json> or stdin required for agent commissions".into());
    };
    if let Some(config) = config {
        agent_input.config = config;
    }

    let result = commission::analyze_agent_commissions(&agent_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Print the effective rate card and anything odd about its coverage.
pub fn run_tiers(config: Option<CommissionConfig>) -> Result<Value, Box<dyn std::error::Error>> {
    let config = config.unwrap_or_default();
    config.validate()?;

    let tiers: Vec<Value> = config
        .ordered_tiers()
        .into_iter()
        .map(|t| {
            json!({
                "min_amount": t.min_amount,
                "max_amount": t.max_amount.map(|m| m.to_string()).unwrap_or_else(|| "unbounded".into()),
                "rate_pct": t.rate_pct,
            })
        })
        .collect();

    Ok(json!({
        "result": {
            "tiers": tiers,
            "agent_share_pct": config.agent_share_pct,
            "institution_share_pct": config.institution_share_pct(),
            "currency_decimals": config.currency_decimals,
        },
        "warnings": config.coverage_warnings(),
    }))
}
