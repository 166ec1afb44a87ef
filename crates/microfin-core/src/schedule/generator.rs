//! Flat-interest installment schedules.
//!
//! Interest is simple interest on the original principal for the whole term,
//! spread evenly over the installments alongside the principal. Both
//! components are truncated to the minor unit on regular installments and the
//! final installment absorbs the remainder, so the schedule reconciles to the
//! cent against the principal and the total interest.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MicrofinError;
use crate::rounding::{round_money, split_evenly};
use crate::schedule::frequency::PaymentFrequency;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, DEFAULT_CURRENCY_DECIMALS};
use crate::MicrofinResult;

const DAYS_PER_YEAR: Decimal = dec!(365);
const PCT_DIVISOR: Decimal = dec!(100);
/// Longest accepted term, one hundred years.
pub const MAX_TERM_DAYS: u32 = 36_500;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Loan terms needed to lay out a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentScheduleInput {
    pub principal: Money,
    /// Annual simple interest rate, as a percentage.
    pub annual_rate_pct: Percent,
    pub term_days: u32,
    pub frequency: PaymentFrequency,
    /// Disbursement date; installment i falls due i periods later.
    pub start_date: NaiveDate,
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,
}

fn default_currency_decimals() -> u32 {
    DEFAULT_CURRENCY_DECIMALS
}

/// One installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// 1-based.
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub total_amount: Money,
}

/// Totals over a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub installments: u32,
    /// Amount of a regular installment (the first one).
    pub installment_amount: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub first_due_date: NaiveDate,
    pub maturity_date: NaiveDate,
}

/// Schedule plus its summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentScheduleOutput {
    pub schedule: Vec<PaymentScheduleEntry>,
    pub summary: ScheduleSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the full installment schedule, rounded at two decimal places.
pub fn calculate_payment_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_days: u32,
    frequency: PaymentFrequency,
    start_date: NaiveDate,
) -> MicrofinResult<Vec<PaymentScheduleEntry>> {
    generate_schedule(
        principal,
        annual_rate_pct,
        term_days,
        frequency,
        start_date,
        DEFAULT_CURRENCY_DECIMALS,
    )
}

/// Simple interest on `principal` for `term_days`, rounded half-up.
pub fn simple_interest(
    principal: Money,
    annual_rate_pct: Percent,
    term_days: u32,
    decimals: u32,
) -> MicrofinResult<Money> {
    let raw = principal
        .checked_mul(annual_rate_pct)
        .and_then(|v| v.checked_mul(Decimal::from(term_days)))
        .and_then(|v| v.checked_div(PCT_DIVISOR * DAYS_PER_YEAR))
        .ok_or_else(|| MicrofinError::InvalidAmount {
            amount: principal,
            reason: format!(
                "interest at {annual_rate_pct}% over {term_days} days overflows decimal range"
            ),
        })?;
    Ok(round_money(raw, decimals))
}

/// Totals for an already generated schedule.
pub fn summarize_schedule(schedule: &[PaymentScheduleEntry]) -> MicrofinResult<ScheduleSummary> {
    let (first, last) = match (schedule.first(), schedule.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(MicrofinError::InvalidSchedule(
                "schedule has no installments".into(),
            ))
        }
    };

    let total_principal = checked_sum(schedule.iter().map(|e| e.principal_amount))?;
    let total_interest = checked_sum(schedule.iter().map(|e| e.interest_amount))?;

    Ok(ScheduleSummary {
        installments: schedule.len() as u32,
        installment_amount: first.total_amount,
        total_principal,
        total_interest,
        total_payable: checked_sum([total_principal, total_interest])?,
        first_due_date: first.due_date,
        maturity_date: last.due_date,
    })
}

/// Schedule and summary wrapped in the standard output envelope.
pub fn build_payment_schedule(
    input: &PaymentScheduleInput,
) -> MicrofinResult<ComputationOutput<PaymentScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = generate_schedule(
        input.principal,
        input.annual_rate_pct,
        input.term_days,
        input.frequency,
        input.start_date,
        input.currency_decimals,
    )?;
    let summary = summarize_schedule(&schedule)?;

    let covered_days = u64::from(summary.installments) * u64::from(input.frequency.period_days());
    let term_days = u64::from(input.term_days);
    if covered_days > term_days {
        warnings.push(format!(
            "Term of {} days is not a whole number of {} periods; final installment falls due {} days after the term",
            input.term_days,
            input.frequency,
            covered_days - term_days
        ));
    }
    if input.annual_rate_pct.is_zero() {
        warnings.push("Zero interest rate: schedule repays principal only".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Flat simple interest over the term, principal and interest split evenly per installment, final installment absorbs rounding",
        input,
        warnings,
        elapsed,
        PaymentScheduleOutput { schedule, summary },
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> MicrofinResult<Money> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| {
            acc.checked_add(amount)
                .ok_or_else(|| MicrofinError::InvalidAmount {
                    amount,
                    reason: "schedule total overflows decimal range".into(),
                })
        })
}

fn generate_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_days: u32,
    frequency: PaymentFrequency,
    start_date: NaiveDate,
    decimals: u32,
) -> MicrofinResult<Vec<PaymentScheduleEntry>> {
    if principal <= Decimal::ZERO {
        return Err(MicrofinError::InvalidAmount {
            amount: principal,
            reason: "principal must be positive".into(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(MicrofinError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "interest rate cannot be negative".into(),
        });
    }

    if term_days > MAX_TERM_DAYS {
        return Err(MicrofinError::InvalidSchedule(format!(
            "term of {term_days} days exceeds the {MAX_TERM_DAYS}-day maximum"
        )));
    }

    let installments = frequency.installment_count(term_days);
    if installments == 0 {
        return Err(MicrofinError::InvalidSchedule(format!(
            "term of {term_days} days yields no {frequency} installments"
        )));
    }

    let total_interest = simple_interest(principal, annual_rate_pct, term_days, decimals)?;
    let (regular_principal, last_principal) = split_evenly(principal, installments, decimals);
    let (regular_interest, last_interest) = split_evenly(total_interest, installments, decimals);
    let regular_total = checked_sum([regular_principal, regular_interest])?;
    let last_total = checked_sum([last_principal, last_interest])?;
    let period_days = u64::from(frequency.period_days());

    let mut schedule = Vec::with_capacity(installments as usize);
    for number in 1..=installments {
        let is_last = number == installments;
        let principal_amount = if is_last { last_principal } else { regular_principal };
        let interest_amount = if is_last { last_interest } else { regular_interest };
        let total_amount = if is_last { last_total } else { regular_total };

        let offset = u64::from(number) * period_days;
        let due_date = start_date
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| {
                MicrofinError::DateError(format!(
                    "installment {number} due date overflows {offset} days after {start_date}"
                ))
            })?;

        schedule.push(PaymentScheduleEntry {
            installment_number: number,
            due_date,
            principal_amount,
            interest_amount,
            total_amount,
        });
    }

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_weekly_schedule_reconciles_principal() {
        let schedule =
            calculate_payment_schedule(dec!(75_000), dec!(12), 180, PaymentFrequency::Weekly, start())
                .unwrap();
        assert_eq!(schedule.len(), 26);
        let total: Money = schedule.iter().map(|e| e.principal_amount).sum();
        assert_eq!(total, dec!(75_000));
    }

    #[test]
    fn test_weekly_schedule_amounts() {
        let schedule =
            calculate_payment_schedule(dec!(75_000), dec!(12), 180, PaymentFrequency::Weekly, start())
                .unwrap();
        // 75,000 / 26 = 2,884.615... -> 2,884.61; last = 75,000 - 25 * 2,884.61
        assert_eq!(schedule[0].principal_amount, dec!(2_884.61));
        assert_eq!(schedule[25].principal_amount, dec!(2_884.75));
        // 75,000 * 12% * 180/365 = 4,438.356... -> 4,438.36; / 26 -> 170.70
        assert_eq!(schedule[0].interest_amount, dec!(170.70));
        assert_eq!(schedule[25].interest_amount, dec!(170.86));
        let interest: Money = schedule.iter().map(|e| e.interest_amount).sum();
        assert_eq!(interest, dec!(4_438.36));
    }

    #[test]
    fn test_total_is_principal_plus_interest() {
        let schedule =
            calculate_payment_schedule(dec!(10_000), dec!(18), 90, PaymentFrequency::Biweekly, start())
                .unwrap();
        for entry in &schedule {
            assert_eq!(entry.total_amount, entry.principal_amount + entry.interest_amount);
        }
    }

    #[test]
    fn test_due_dates_step_by_period() {
        let schedule =
            calculate_payment_schedule(dec!(3_000), dec!(10), 90, PaymentFrequency::Monthly, start())
                .unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].due_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(schedule[1].due_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(schedule[2].due_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(schedule[2].installment_number, 3);
    }

    #[test]
    fn test_daily_schedule_one_entry_per_day() {
        let schedule =
            calculate_payment_schedule(dec!(1_000), dec!(36.5), 10, PaymentFrequency::Daily, start())
                .unwrap();
        assert_eq!(schedule.len(), 10);
        // 1,000 * 36.5% * 10/365 = 10
        let interest: Money = schedule.iter().map(|e| e.interest_amount).sum();
        assert_eq!(interest, dec!(10));
        assert_eq!(schedule[9].due_date, NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
    }

    #[test]
    fn test_zero_term_rejected() {
        let err = calculate_payment_schedule(dec!(1_000), dec!(10), 0, PaymentFrequency::Weekly, start())
            .unwrap_err();
        assert!(matches!(err, MicrofinError::InvalidSchedule(_)));
    }

    #[test]
    fn test_non_positive_principal_rejected() {
        let err = calculate_payment_schedule(dec!(0), dec!(10), 30, PaymentFrequency::Weekly, start())
            .unwrap_err();
        assert!(matches!(err, MicrofinError::InvalidAmount { .. }));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = calculate_payment_schedule(dec!(1_000), dec!(-1), 30, PaymentFrequency::Weekly, start())
            .unwrap_err();
        assert!(matches!(err, MicrofinError::InvalidInput { .. }));
    }

    #[test]
    fn test_due_date_overflow_is_date_error() {
        let err = calculate_payment_schedule(
            dec!(1_000),
            dec!(10),
            60,
            PaymentFrequency::Monthly,
            NaiveDate::MAX,
        )
        .unwrap_err();
        assert!(matches!(err, MicrofinError::DateError(_)));
    }

    #[test]
    fn test_term_above_maximum_rejected_before_allocating() {
        for term_days in [MAX_TERM_DAYS + 1, u32::MAX] {
            let err = calculate_payment_schedule(
                dec!(1_000),
                dec!(10),
                term_days,
                PaymentFrequency::Daily,
                start(),
            )
            .unwrap_err();
            assert!(matches!(err, MicrofinError::InvalidSchedule(_)));
        }
    }

    #[test]
    fn test_term_at_maximum_accepted() {
        let schedule = calculate_payment_schedule(
            dec!(1_000_000),
            dec!(5),
            MAX_TERM_DAYS,
            PaymentFrequency::Monthly,
            start(),
        )
        .unwrap();
        // 36,500 / 30 rounds up to 1,217
        assert_eq!(schedule.len(), 1_217);
    }

    #[test]
    fn test_overflowing_interest_is_an_error() {
        let principal = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        let err = calculate_payment_schedule(
            principal,
            dec!(50),
            3_650,
            PaymentFrequency::Monthly,
            start(),
        )
        .unwrap_err();
        assert!(matches!(err, MicrofinError::InvalidAmount { .. }));
        assert!(simple_interest(Decimal::MAX, dec!(100), 365, 2).is_err());
    }

    #[test]
    fn test_summary_totals() {
        let schedule =
            calculate_payment_schedule(dec!(75_000), dec!(12), 180, PaymentFrequency::Weekly, start())
                .unwrap();
        let summary = summarize_schedule(&schedule).unwrap();
        assert_eq!(summary.installments, 26);
        assert_eq!(summary.total_principal, dec!(75_000));
        assert_eq!(summary.total_interest, dec!(4_438.36));
        assert_eq!(summary.total_payable, dec!(79_438.36));
        assert_eq!(summary.installment_amount, dec!(3_055.31));
        assert_eq!(summary.maturity_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_summarize_empty_schedule_rejected() {
        assert!(matches!(
            summarize_schedule(&[]),
            Err(MicrofinError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_build_warns_when_periods_overrun_term() {
        let input = PaymentScheduleInput {
            principal: dec!(75_000),
            annual_rate_pct: dec!(12),
            term_days: 180,
            frequency: PaymentFrequency::Weekly,
            start_date: start(),
            currency_decimals: 2,
        };
        let out = build_payment_schedule(&input).unwrap();
        assert_eq!(out.result.schedule.len(), 26);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("2 days after the term"));
    }
}
