pub mod commission;
pub mod schedule;
