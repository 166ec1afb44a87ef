//! Currency rounding.
//!
//! Every amount the engine reports goes through one of these two helpers so
//! the rounding rule is stated once: round-half-up (midpoint away from zero)
//! at the currency's minor unit for reported amounts, truncation toward zero
//! when a total is split into equal parts and a final part absorbs the rest.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Money;

/// Round half-up at `decimals` places. 1250.025 -> 1250.03.
pub fn round_money(amount: Money, decimals: u32) -> Money {
    amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncate toward zero at `decimals` places. 2884.6153 -> 2884.61.
pub fn truncate_money(amount: Money, decimals: u32) -> Money {
    amount.round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
}

/// Split `total` into `parts` shares truncated to the minor unit, the last
/// share taking whatever remains so the shares sum back to `total` exactly.
///
/// Returns `(regular_share, last_share)`. `parts` must be non-zero.
pub fn split_evenly(total: Money, parts: u32, decimals: u32) -> (Money, Money) {
    let n = Decimal::from(parts);
    let regular = truncate_money(total / n, decimals);
    let last = total - regular * (n - Decimal::ONE);
    (regular, last)
}
