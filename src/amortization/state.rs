//! Running state while a schedule is generated

use crate::loan::LoanRequest;
use chrono::{Months, NaiveDate};

/// Balance and timing for the period currently being scheduled
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Current period (1-indexed, 0 before the first advance)
    pub period: u32,

    /// Loan year (1-indexed)
    pub loan_year: u32,

    /// Month within loan year (1-12)
    pub month_in_loan_year: u32,

    /// Balance outstanding at the start of the period
    pub opening_balance: f64,

    /// Due date of the current period, when a first payment date is configured
    pub due_date: Option<NaiveDate>,

    first_payment_date: Option<NaiveDate>,
}

impl ScheduleState {
    /// Initial state: full principal outstanding, no period scheduled yet
    pub fn from_request(request: &LoanRequest, first_payment_date: Option<NaiveDate>) -> Self {
        Self {
            period: 0,
            loan_year: 1,
            month_in_loan_year: 1,
            opening_balance: request.principal,
            due_date: None,
            first_payment_date,
        }
    }

    /// Move to the next period
    pub fn advance_period(&mut self, request: &LoanRequest) {
        self.period += 1;
        self.loan_year = request.loan_year(self.period);
        self.month_in_loan_year = request.month_in_loan_year(self.period);
        // chrono clamps to the last day of shorter months (Jan 31 -> Feb 28)
        self.due_date = self
            .first_payment_date
            .and_then(|first| first.checked_add_months(Months::new(self.period - 1)));
    }

    /// Record principal repaid this period; returns the closing balance
    pub fn repay(&mut self, principal: f64) -> f64 {
        self.opening_balance -= principal;
        self.opening_balance
    }
}
