//! Agent commission totals over an explicit disbursement period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::commission::calculator::calculate_commission;
use crate::commission::tiers::CommissionConfig;
use crate::error::MicrofinError;
use crate::rounding::round_money;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MicrofinResult;

/// Decimal places kept on the weighted average rate.
const AVERAGE_RATE_DECIMALS: u32 = 4;

/// A loan as supplied by the loan register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    pub amount: Money,
    /// Loans not yet disbursed carry no date and are never counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disbursement_date: Option<NaiveDate>,
    /// Commission already booked for the loan. Recomputed from the rate card
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_amount: Option<Money>,
}

/// Input for an agent's period totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCommissionInput {
    pub loans: Vec<LoanRecord>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(default)]
    pub config: CommissionConfig,
}

/// Totals over the loans disbursed inside the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCommissionSummary {
    pub total_loans: u32,
    pub total_loan_amount: Money,
    pub total_commission: Money,
    /// total_commission / total_loan_amount * 100, zero for an empty period.
    pub average_commission_rate: Percent,
}

/// Sum the loans disbursed within `[period_start, period_end]`, both ends
/// inclusive. The caller decides the period; nothing here defaults to "now".
pub fn calculate_agent_commissions(
    loans: &[LoanRecord],
    period_start: NaiveDate,
    period_end: NaiveDate,
    config: &CommissionConfig,
) -> MicrofinResult<AgentCommissionSummary> {
    if period_start > period_end {
        return Err(MicrofinError::InvalidInput {
            field: "period_start".into(),
            reason: format!("period start {period_start} is after period end {period_end}"),
        });
    }

    let mut total_loans: u32 = 0;
    let mut total_loan_amount = Decimal::ZERO;
    let mut total_commission = Decimal::ZERO;

    for loan in loans
        .iter()
        .filter(|l| in_period(l.disbursement_date, period_start, period_end))
    {
        if loan.amount <= Decimal::ZERO {
            return Err(MicrofinError::InvalidAmount {
                amount: loan.amount,
                reason: format!("loan {} must have a positive amount", loan.id),
            });
        }
        let commission = match loan.commission_amount {
            Some(booked) => booked,
            None => calculate_commission(loan.amount, config)?.commission_amount,
        };
        total_loans += 1;
        total_loan_amount = checked_total(total_loan_amount, loan.amount)?;
        total_commission = checked_total(total_commission, commission)?;
    }

    let average_commission_rate = if total_loan_amount.is_zero() {
        Decimal::ZERO
    } else {
        let rate = total_commission
            .checked_div(total_loan_amount)
            .and_then(|r| r.checked_mul(dec!(100)))
            .ok_or_else(|| MicrofinError::InvalidAmount {
                amount: total_commission,
                reason: "average commission rate overflows decimal range".into(),
            })?;
        round_money(rate, AVERAGE_RATE_DECIMALS)
    };

    Ok(AgentCommissionSummary {
        total_loans,
        total_loan_amount,
        total_commission,
        average_commission_rate,
    })
}

fn checked_total(total: Money, amount: Money) -> MicrofinResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| MicrofinError::InvalidAmount {
            amount,
            reason: "period total overflows decimal range".into(),
        })
}

fn in_period(date: Option<NaiveDate>, start: NaiveDate, end: NaiveDate) -> bool {
    date.is_some_and(|d| d >= start && d <= end)
}

/// Period totals wrapped in the standard output envelope.
pub fn analyze_agent_commissions(
    input: &AgentCommissionInput,
) -> MicrofinResult<ComputationOutput<AgentCommissionSummary>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let undisbursed = input
        .loans
        .iter()
        .filter(|l| l.disbursement_date.is_none())
        .count();
    if undisbursed > 0 {
        warnings.push(format!(
            "{undisbursed} loan(s) without a disbursement date were excluded"
        ));
    }
    let recomputed = input
        .loans
        .iter()
        .filter(|l| {
            l.commission_amount.is_none()
                && in_period(l.disbursement_date, input.period_start, input.period_end)
        })
        .count();
    if recomputed > 0 {
        warnings.extend(input.config.coverage_warnings());
    }

    let result = calculate_agent_commissions(
        &input.loans,
        input.period_start,
        input.period_end,
        &input.config,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Period aggregation: loans disbursed within the inclusive period, booked or recomputed commission, amount-weighted average rate",
        input,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(id: &str, amount: Decimal, disbursed: Option<NaiveDate>) -> LoanRecord {
        LoanRecord {
            id: id.into(),
            amount,
            disbursement_date: disbursed,
            commission_amount: None,
        }
    }

    #[test]
    fn test_empty_loan_set_is_all_zero() {
        let summary = calculate_agent_commissions(
            &[],
            date(2024, 1, 1),
            date(2024, 1, 31),
            &CommissionConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.total_loans, 0);
        assert_eq!(summary.total_loan_amount, Decimal::ZERO);
        assert_eq!(summary.total_commission, Decimal::ZERO);
        assert_eq!(summary.average_commission_rate, Decimal::ZERO);
    }

    #[test]
    fn test_period_bounds_are_inclusive() {
        let loans = vec![
            loan("on-start", dec!(10_000), Some(date(2024, 3, 1))),
            loan("on-end", dec!(10_000), Some(date(2024, 3, 31))),
            loan("before", dec!(10_000), Some(date(2024, 2, 29))),
            loan("after", dec!(10_000), Some(date(2024, 4, 1))),
            loan("pending", dec!(10_000), None),
        ];
        let summary = calculate_agent_commissions(
            &loans,
            date(2024, 3, 1),
            date(2024, 3, 31),
            &CommissionConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.total_loans, 2);
        assert_eq!(summary.total_loan_amount, dec!(20_000));
        assert_eq!(summary.total_commission, dec!(600));
        assert_eq!(summary.average_commission_rate, dec!(3));
    }

    #[test]
    fn test_booked_commission_preferred_over_recompute() {
        let mut booked = loan("booked", dec!(100_000), Some(date(2024, 5, 10)));
        booked.commission_amount = Some(dec!(1_000));
        let recomputed = loan("fresh", dec!(100_000), Some(date(2024, 5, 11)));
        let summary = calculate_agent_commissions(
            &[booked, recomputed],
            date(2024, 5, 1),
            date(2024, 5, 31),
            &CommissionConfig::default(),
        )
        .unwrap();
        // 1,000 booked + 2,500 recomputed over 200,000
        assert_eq!(summary.total_commission, dec!(3_500));
        assert_eq!(summary.average_commission_rate, dec!(1.75));
    }

    #[test]
    fn test_weighted_average_across_tiers() {
        let loans = vec![
            loan("a", dec!(50_000), Some(date(2024, 6, 1))),
            loan("b", dec!(150_000), Some(date(2024, 6, 2))),
        ];
        let summary = calculate_agent_commissions(
            &loans,
            date(2024, 6, 1),
            date(2024, 6, 30),
            &CommissionConfig::default(),
        )
        .unwrap();
        // 1,500 + 3,000 = 4,500 over 200,000 = 2.25%
        assert_eq!(summary.total_commission, dec!(4_500));
        assert_eq!(summary.average_commission_rate, dec!(2.25));
    }

    #[test]
    fn test_inverted_period_rejected() {
        let err = calculate_agent_commissions(
            &[],
            date(2024, 2, 1),
            date(2024, 1, 1),
            &CommissionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MicrofinError::InvalidInput { .. }));
    }

    #[test]
    fn test_invalid_loan_amount_in_period_fails() {
        let loans = vec![loan("bad", dec!(0), Some(date(2024, 1, 15)))];
        let err = calculate_agent_commissions(
            &loans,
            date(2024, 1, 1),
            date(2024, 1, 31),
            &CommissionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MicrofinError::InvalidAmount { .. }));
    }

    #[test]
    fn test_booked_loan_with_non_positive_amount_fails() {
        for amount in [dec!(0), dec!(-1)] {
            let loans = vec![LoanRecord {
                commission_amount: Some(dec!(50)),
                ..loan("booked", amount, Some(date(2024, 1, 15)))
            }];
            let err = calculate_agent_commissions(
                &loans,
                date(2024, 1, 1),
                date(2024, 1, 31),
                &CommissionConfig::default(),
            )
            .unwrap_err();
            assert!(matches!(err, MicrofinError::InvalidAmount { .. }), "amount {amount}");
        }
    }

    #[test]
    fn test_non_positive_amount_outside_period_is_ignored() {
        let loans = vec![
            loan("old", dec!(-5), Some(date(2023, 12, 31))),
            loan("a", dec!(10_000), Some(date(2024, 1, 15))),
        ];
        let summary = calculate_agent_commissions(
            &loans,
            date(2024, 1, 1),
            date(2024, 1, 31),
            &CommissionConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.total_loans, 1);
        assert_eq!(summary.total_loan_amount, dec!(10_000));
    }

    #[test]
    fn test_analyze_warns_about_undisbursed_loans() {
        let input = AgentCommissionInput {
            loans: vec![
                loan("a", dec!(40_000), Some(date(2024, 7, 3))),
                loan("b", dec!(40_000), None),
            ],
            period_start: date(2024, 7, 1),
            period_end: date(2024, 7, 31),
            config: CommissionConfig::default(),
        };
        let out = analyze_agent_commissions(&input).unwrap();
        assert_eq!(out.result.total_loans, 1);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("1 loan(s)"));
    }
}
