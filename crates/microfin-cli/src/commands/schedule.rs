use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use microfin_core::schedule::{
    self, PaymentAllocationInput, PaymentFrequency, PaymentScheduleInput,
};
use microfin_core::DEFAULT_CURRENCY_DECIMALS;

use crate::input;

/// Loan terms shared by the schedule and allocation commands
#[derive(Args)]
pub struct LoanTermsArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual simple interest rate in percent (12 = 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Term in days
    #[arg(long, alias = "days")]
    pub term_days: Option<u32>,

    /// Payment frequency: daily, weekly, biweekly or monthly
    #[arg(long)]
    pub frequency: Option<PaymentFrequency>,

    /// Disbursement date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Decimal places of the currency's minor unit
    #[arg(long, default_value_t = DEFAULT_CURRENCY_DECIMALS)]
    pub currency_decimals: u32,
}

/// Arguments for payment schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: LoanTermsArgs,
}

/// Arguments for allocating payments received against a schedule
#[derive(Args)]
pub struct AllocationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: LoanTermsArgs,

    /// Total received on the loan so far
    #[arg(long, alias = "paid")]
    pub amount_paid: Option<Decimal>,

    /// Date arrears are measured at (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn terms_from_args(terms: LoanTermsArgs) -> Result<PaymentScheduleInput, Box<dyn std::error::Error>> {
    Ok(PaymentScheduleInput {
        principal: terms
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: terms
            .annual_rate_pct
            .ok_or("--annual-rate-pct is required (or provide --input)")?,
        term_days: terms
            .term_days
            .ok_or("--term-days is required (or provide --input)")?,
        frequency: terms
            .frequency
            .ok_or("--frequency is required (or provide --input)")?,
        start_date: terms.start_date.unwrap_or_else(today),
        currency_decimals: terms.currency_decimals,
    })
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: PaymentScheduleInput = if let Some(ref path) = args.input {
        log::debug!("schedule input from {path}");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        terms_from_args(args.terms)?
    };

    log::info!(
        "scheduling {} over {} days, {}",
        schedule_input.principal,
        schedule_input.term_days,
        schedule_input.frequency
    );
    let result = schedule::build_payment_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_allocation(args: AllocationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let allocation_input: PaymentAllocationInput = if let Some(ref path) = args.input {
        log::debug!("allocation input from {path}");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PaymentAllocationInput {
            amount_paid: args
                .amount_paid
                .ok_or("--amount-paid is required (or provide --input)")?,
            as_of: args.as_of.unwrap_or_else(today),
            loan: terms_from_args(args.terms)?,
        }
    };

    let result = schedule::analyze_payment_allocation(&allocation_input)?;
    Ok(serde_json::to_value(result)?)
}
