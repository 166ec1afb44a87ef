//! Straight-line projection of an agent's commission over a loan term.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::commission::calculator::calculate_commission;
use crate::commission::tiers::CommissionConfig;
use crate::error::MicrofinError;
use crate::rounding::round_money;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MicrofinResult;

/// Input for a commission projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub loan_amount: Money,
    pub term_months: u32,
    #[serde(default)]
    pub config: CommissionConfig,
}

/// Agent commission spread evenly across the term.
///
/// `total_projection` is the one-time commission realised over the whole
/// term. It is not `monthly_projection * term_months`, which can differ by
/// rounding and would suggest a commission earned again every month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionProjection {
    pub loan_amount: Money,
    pub term_months: u32,
    pub agent_commission: Money,
    pub monthly_projection: Money,
    pub total_projection: Money,
}

/// Project the agent's commission on `loan_amount` over `term_months`.
pub fn project_commission(
    loan_amount: Money,
    term_months: u32,
    config: &CommissionConfig,
) -> MicrofinResult<CommissionProjection> {
    if term_months == 0 {
        return Err(MicrofinError::InvalidTerm {
            term: 0,
            reason: "term in months must be positive".into(),
        });
    }

    let agent_commission = calculate_commission(loan_amount, config)?.agent_commission;
    let monthly_projection = round_money(
        agent_commission / Decimal::from(term_months),
        config.currency_decimals,
    );

    Ok(CommissionProjection {
        loan_amount,
        term_months,
        agent_commission,
        monthly_projection,
        total_projection: agent_commission,
    })
}

/// Commission projection wrapped in the standard output envelope.
pub fn analyze_projection(
    input: &ProjectionInput,
) -> MicrofinResult<ComputationOutput<CommissionProjection>> {
    let start = Instant::now();
    let mut warnings = input.config.coverage_warnings();

    let result = project_commission(input.loan_amount, input.term_months, &input.config)?;

    let reassembled = result.monthly_projection * Decimal::from(result.term_months);
    if reassembled != result.total_projection {
        warnings.push(format!(
            "Monthly projection x {} months = {} differs from the one-time commission {} by rounding",
            result.term_months, reassembled, result.total_projection
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Straight-line projection: agent commission divided evenly by term months; total equals the one-time agent commission",
        input,
        warnings,
        elapsed,
        result,
    ))
}
