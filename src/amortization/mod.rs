//! Amortization formulas, schedule engine and effective-rate calculation

mod calculator;
mod engine;
mod irr;
mod schedule;
mod state;

pub use calculator::{
    annuity_payment, calculate, compute, differentiated_interest, differentiated_payment, PaymentResult,
};
pub use engine::{ScheduleConfig, ScheduleEngine};
pub use irr::{calculate_irr, effective_annual_rate};
pub use schedule::{RepaymentSchedule, ScheduleRow, ScheduleSummary};
pub use state::ScheduleState;
