//! Commission rate tiers and the configuration that carries them.
//!
//! The tier table is business configuration: hosts may replace it wholesale
//! (JSON or YAML through serde) and the engine validates it on every use
//! rather than assuming it is well formed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MicrofinError;
use crate::types::{Money, Percent, DEFAULT_CURRENCY_DECIMALS};
use crate::MicrofinResult;

const DEFAULT_AGENT_SHARE_PCT: Percent = dec!(60);
const MAX_PCT: Percent = dec!(100);
/// Tiers quoted in whole currency units leave a one-unit step between a
/// tier's max and the next tier's min (50,000 -> 50,001).
const TIER_STEP: Money = Decimal::ONE;

/// One row of the commission rate card. Bounds are inclusive; a missing
/// `max_amount` means the tier is unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub min_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Money>,
    pub rate_pct: Percent,
}

impl RateTier {
    pub fn new(min_amount: Money, max_amount: Option<Money>, rate_pct: Percent) -> Self {
        Self {
            min_amount,
            max_amount,
            rate_pct,
        }
    }

    /// `min_amount <= amount <= max_amount`, both ends inclusive.
    pub fn contains(&self, amount: Money) -> bool {
        amount >= self.min_amount && self.max_amount.map_or(true, |max| amount <= max)
    }

    /// `contains`, widened to the fractional amounts in the one-unit step up
    /// to `next` when `next` starts within `TIER_STEP` of this tier's max.
    /// 50,000.50 sits in the 0-50,000 tier when the next one starts at 50,001.
    fn covers(&self, amount: Money, next: Option<&RateTier>) -> bool {
        if self.contains(amount) {
            return true;
        }
        match (self.max_amount, next) {
            (Some(max), Some(next)) => {
                next.min_amount > max
                    && next.min_amount <= max + TIER_STEP
                    && amount > max
                    && amount < next.min_amount
            }
            _ => false,
        }
    }
}

/// Commission rate card plus the agent/institution split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub tiers: Vec<RateTier>,
    /// Agent's share of the commission; the institution keeps the rest.
    #[serde(default = "default_agent_share_pct")]
    pub agent_share_pct: Percent,
    /// Minor-unit precision used when rounding reported amounts.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,
}

fn default_agent_share_pct() -> Percent {
    DEFAULT_AGENT_SHARE_PCT
}

fn default_currency_decimals() -> u32 {
    DEFAULT_CURRENCY_DECIMALS
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                RateTier::new(dec!(0), Some(dec!(50_000)), dec!(3.0)),
                RateTier::new(dec!(50_001), Some(dec!(100_000)), dec!(2.5)),
                RateTier::new(dec!(100_001), Some(dec!(200_000)), dec!(2.0)),
                RateTier::new(dec!(200_001), Some(dec!(500_000)), dec!(1.5)),
                RateTier::new(dec!(500_001), None, dec!(1.0)),
            ],
            agent_share_pct: DEFAULT_AGENT_SHARE_PCT,
            currency_decimals: DEFAULT_CURRENCY_DECIMALS,
        }
    }
}

impl CommissionConfig {
    /// Institution's share of the commission, as a percentage.
    pub fn institution_share_pct(&self) -> Percent {
        MAX_PCT - self.agent_share_pct
    }

    /// Reject tables that cannot produce a meaningful commission.
    pub fn validate(&self) -> MicrofinResult<()> {
        if self.tiers.is_empty() {
            return Err(MicrofinError::Configuration(
                "commission tier table is empty".into(),
            ));
        }
        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.min_amount < Decimal::ZERO {
                return Err(MicrofinError::Configuration(format!(
                    "tier {i}: min_amount {} is negative",
                    tier.min_amount
                )));
            }
            if let Some(max) = tier.max_amount {
                if max < tier.min_amount {
                    return Err(MicrofinError::Configuration(format!(
                        "tier {i}: max_amount {max} is below min_amount {}",
                        tier.min_amount
                    )));
                }
            }
            if tier.rate_pct < Decimal::ZERO || tier.rate_pct > MAX_PCT {
                return Err(MicrofinError::Configuration(format!(
                    "tier {i}: rate {}% is outside 0-100%",
                    tier.rate_pct
                )));
            }
        }
        if self.agent_share_pct < Decimal::ZERO || self.agent_share_pct > MAX_PCT {
            return Err(MicrofinError::Configuration(format!(
                "agent share {}% is outside 0-100%",
                self.agent_share_pct
            )));
        }
        Ok(())
    }

    /// Tiers ordered by ascending `min_amount`. The sort is stable, so tiers
    /// sharing a `min_amount` keep their declaration order.
    pub fn ordered_tiers(&self) -> Vec<&RateTier> {
        let mut ordered: Vec<&RateTier> = self.tiers.iter().collect();
        ordered.sort_by(|a, b| a.min_amount.cmp(&b.min_amount));
        ordered
    }

    /// Human-readable notes about gaps, overlaps and a bounded top tier.
    /// These never fail a calculation; lookups fall back to first match wins.
    pub fn coverage_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let ordered = self.ordered_tiers();

        for pair in ordered.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            match prev.max_amount {
                None => warnings.push(format!(
                    "Unbounded tier starting at {} overlaps tier starting at {}; first match wins",
                    prev.min_amount, next.min_amount
                )),
                Some(max) if next.min_amount <= max => warnings.push(format!(
                    "Tiers overlap between {} and {}; first match wins",
                    next.min_amount, max
                )),
                Some(max) if next.min_amount > max + TIER_STEP => warnings.push(format!(
                    "Gap in tier table between {} and {}; amounts in the gap are rejected",
                    max, next.min_amount
                )),
                Some(_) => {}
            }
        }

        if let Some(last) = ordered.last() {
            if let Some(max) = last.max_amount {
                warnings.push(format!(
                    "Highest tier is capped at {max}; larger amounts are rejected"
                ));
            }
        }

        warnings
    }
}

/// Find the tier for `loan_amount`: linear scan in ascending `min_amount`
/// order, first match wins. Amounts in the one-unit step between adjacent
/// tiers stay with the lower tier.
pub fn rate_for_amount(loan_amount: Money, config: &CommissionConfig) -> MicrofinResult<&RateTier> {
    if loan_amount <= Decimal::ZERO {
        return Err(MicrofinError::InvalidAmount {
            amount: loan_amount,
            reason: "loan amount must be positive".into(),
        });
    }
    config.validate()?;

    let ordered = config.ordered_tiers();
    let matched = ordered
        .iter()
        .enumerate()
        .find(|(i, tier)| tier.covers(loan_amount, ordered.get(i + 1).copied()))
        .map(|(_, tier)| *tier);

    matched.ok_or_else(|| {
        MicrofinError::Configuration(format!(
            "no commission tier covers loan amount {loan_amount}"
        ))
    })
}
