use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MicrofinError;

/// How often installments fall due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl PaymentFrequency {
    /// Days between consecutive due dates. Months are counted as 30 days.
    pub fn period_days(self) -> u32 {
        match self {
            PaymentFrequency::Daily => 1,
            PaymentFrequency::Weekly => 7,
            PaymentFrequency::Biweekly => 14,
            PaymentFrequency::Monthly => 30,
        }
    }

    /// Installments needed to cover `term_days`, rounding up so a partial
    /// final period still gets its own installment.
    pub fn installment_count(self, term_days: u32) -> u32 {
        term_days.div_ceil(self.period_days())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Daily => "daily",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = MicrofinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PaymentFrequency::Daily),
            "weekly" => Ok(PaymentFrequency::Weekly),
            "biweekly" => Ok(PaymentFrequency::Biweekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            other => Err(MicrofinError::InvalidSchedule(format!(
                "unsupported payment frequency '{other}'"
            ))),
        }
    }
}
