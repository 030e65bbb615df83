//! Credit Calculator - Loan repayment figures under annuity, differentiated and interest-free policies
//!
//! This library provides:
//! - Periodic payment, total overpayment and total repaid for a loan
//! - Period-by-period repayment schedules with optional due dates
//! - Effective annual rate (IRR) of a schedule
//! - Policy comparison and parallel batch quoting from CSV

pub mod error;
pub mod loan;
pub mod amortization;
pub mod quote;

// Re-export commonly used types
pub use error::{LoanError, LoanResult};
pub use loan::{AmortizationPolicy, LoanRequest, LoanRecord};
pub use amortization::{compute, calculate, PaymentResult, ScheduleConfig, ScheduleEngine, RepaymentSchedule, ScheduleRow};
pub use quote::{QuoteRunner, PolicyQuote, BatchResult};
