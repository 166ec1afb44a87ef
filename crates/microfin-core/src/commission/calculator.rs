//! Per-loan commission: tier lookup, commission amount, agent/institution split.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::commission::tiers::{rate_for_amount, CommissionConfig};
use crate::rounding::round_money;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::{MicrofinError, MicrofinResult};

const PCT_DIVISOR: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Input for a single-loan commission calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionInput {
    pub loan_amount: Money,
    /// Rate card override; the default table applies when omitted.
    #[serde(default)]
    pub config: CommissionConfig,
}

/// Commission on one loan and how it is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionCalculation {
    pub loan_amount: Money,
    /// Tier rate applied, as a percentage.
    pub commission_rate: Percent,
    pub commission_amount: Money,
    pub agent_commission: Money,
    /// commission_amount - agent_commission, never rounded on its own.
    pub institution_share: Money,
    /// loan_amount - commission_amount.
    pub net_amount: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Commission for `loan_amount` under `config`.
///
/// The commission and the agent's share are rounded half-up at the currency
/// minor unit; the institution's share and the net amount are derived by
/// subtraction so both reconcile exactly.
pub fn calculate_commission(
    loan_amount: Money,
    config: &CommissionConfig,
) -> MicrofinResult<CommissionCalculation> {
    let tier = rate_for_amount(loan_amount, config)?;
    let decimals = config.currency_decimals;

    let commission_rate = tier.rate_pct;
    let commission_amount = round_money(pct_of(loan_amount, commission_rate)?, decimals);
    let agent_commission = round_money(
        pct_of(commission_amount, config.agent_share_pct)?,
        decimals,
    );
    let institution_share = commission_amount - agent_commission;
    let net_amount = loan_amount - commission_amount;

    Ok(CommissionCalculation {
        loan_amount,
        commission_rate,
        commission_amount,
        agent_commission,
        institution_share,
        net_amount,
    })
}

fn pct_of(amount: Money, pct: Percent) -> MicrofinResult<Money> {
    amount
        .checked_mul(pct)
        .and_then(|v| v.checked_div(PCT_DIVISOR))
        .ok_or_else(|| MicrofinError::InvalidAmount {
            amount,
            reason: format!("{pct}% of this amount overflows decimal range"),
        })
}

/// Commission calculation wrapped in the standard output envelope.
pub fn analyze_commission(
    input: &CommissionInput,
) -> MicrofinResult<ComputationOutput<CommissionCalculation>> {
    let start = Instant::now();
    let warnings = input.config.coverage_warnings();

    let result = calculate_commission(input.loan_amount, &input.config)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tiered commission: first matching tier by ascending minimum, round-half-up at currency precision, agent share rounded, institution share by difference",
        input,
        warnings,
        elapsed,
        result,
    ))
}
