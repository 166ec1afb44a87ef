//! Installment schedules for flat simple-interest loans and allocation of
//! payments received against them.

pub mod allocation;
pub mod frequency;
pub mod generator;

pub use allocation::{
    allocate_payments, analyze_payment_allocation, PaymentAllocation, PaymentAllocationInput,
};
pub use frequency::PaymentFrequency;
pub use generator::{
    build_payment_schedule, calculate_payment_schedule, simple_interest, summarize_schedule,
    MAX_TERM_DAYS, PaymentScheduleEntry, PaymentScheduleInput, PaymentScheduleOutput, ScheduleSummary,
};
