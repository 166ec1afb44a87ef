//! Settling payments received against a schedule.
//!
//! Payments are applied to installments in order. Within an installment the
//! interest is settled before the principal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MicrofinError;
use crate::schedule::generator::{build_payment_schedule, PaymentScheduleEntry, PaymentScheduleInput};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MicrofinResult;

/// Input for allocating the cumulative amount paid on a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocationInput {
    pub loan: PaymentScheduleInput,
    /// Everything received on the loan so far.
    pub amount_paid: Money,
    /// Installments due on or before this date count towards arrears.
    pub as_of: NaiveDate,
}

/// Where the money went and what is still owed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub amount_paid: Money,
    /// Installments settled in full.
    pub installments_paid: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub outstanding_interest: Money,
    pub outstanding_principal: Money,
    /// Paid beyond the whole schedule.
    pub overpayment: Money,
    /// Unpaid part of installments due on or before `as_of`.
    pub arrears: Money,
    pub installments_in_arrears: u32,
    /// First installment not yet settled in full.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_installment: Option<PaymentScheduleEntry>,
}

/// Apply `amount_paid` to `schedule` as of `as_of`.
pub fn allocate_payments(
    schedule: &[PaymentScheduleEntry],
    amount_paid: Money,
    as_of: NaiveDate,
) -> MicrofinResult<PaymentAllocation> {
    if amount_paid < Decimal::ZERO {
        return Err(MicrofinError::InvalidAmount {
            amount: amount_paid,
            reason: "amount paid cannot be negative".into(),
        });
    }
    if schedule.is_empty() {
        return Err(MicrofinError::InvalidSchedule(
            "cannot allocate payments against an empty schedule".into(),
        ));
    }

    let mut remaining = amount_paid;
    let mut allocation = PaymentAllocation {
        amount_paid,
        installments_paid: 0,
        interest_paid: Decimal::ZERO,
        principal_paid: Decimal::ZERO,
        outstanding_interest: Decimal::ZERO,
        outstanding_principal: Decimal::ZERO,
        overpayment: Decimal::ZERO,
        arrears: Decimal::ZERO,
        installments_in_arrears: 0,
        next_installment: None,
    };

    for entry in schedule {
        let interest_cover = remaining.min(entry.interest_amount);
        remaining -= interest_cover;
        let principal_cover = remaining.min(entry.principal_amount);
        remaining -= principal_cover;

        allocation.interest_paid += interest_cover;
        allocation.principal_paid += principal_cover;

        let unpaid = entry.total_amount - interest_cover - principal_cover;
        if unpaid.is_zero() {
            allocation.installments_paid += 1;
            continue;
        }

        allocation.outstanding_interest += entry.interest_amount - interest_cover;
        allocation.outstanding_principal += entry.principal_amount - principal_cover;
        if allocation.next_installment.is_none() {
            allocation.next_installment = Some(entry.clone());
        }
        if entry.due_date <= as_of {
            allocation.arrears += unpaid;
            allocation.installments_in_arrears += 1;
        }
    }

    allocation.overpayment = remaining;
    Ok(allocation)
}

/// Build the loan's schedule and allocate payments against it.
pub fn analyze_payment_allocation(
    input: &PaymentAllocationInput,
) -> MicrofinResult<ComputationOutput<PaymentAllocation>> {
    let start = Instant::now();

    let built = build_payment_schedule(&input.loan)?;
    let mut warnings = built.warnings;

    let result = allocate_payments(&built.result.schedule, input.amount_paid, input.as_of)?;

    if result.overpayment > Decimal::ZERO {
        warnings.push(format!(
            "Payments exceed the total payable by {}",
            result.overpayment
        ));
    }
    if input.as_of < input.loan.start_date {
        warnings.push(format!(
            "As-of date {} precedes the loan start date {}",
            input.as_of, input.loan.start_date
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Sequential allocation: installments in due order, interest before principal within each installment",
        input,
        warnings,
        elapsed,
        result,
    ))
}
