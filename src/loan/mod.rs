//! Loan request data structures and CSV loading

mod data;
pub mod loader;

pub use data::{AmortizationPolicy, LoanRequest, MAX_TERM_MONTHS};
pub use loader::{load_loans, load_loans_from_reader, LoanRecord};
