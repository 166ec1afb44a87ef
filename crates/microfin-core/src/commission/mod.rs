//! Loan commission: rate card lookup, per-loan commission and split,
//! straight-line projection, and agent period totals.

pub mod aggregation;
pub mod calculator;
pub mod projection;
pub mod tiers;

pub use aggregation::{
    analyze_agent_commissions, calculate_agent_commissions, AgentCommissionInput,
    AgentCommissionSummary, LoanRecord,
};
pub use calculator::{analyze_commission, calculate_commission, CommissionCalculation, CommissionInput};
pub use projection::{analyze_projection, project_commission, CommissionProjection, ProjectionInput};
pub use tiers::{rate_for_amount, CommissionConfig, RateTier};
