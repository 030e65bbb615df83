//! Per-period schedule output structures

use crate::error::LoanResult;
use crate::loan::{AmortizationPolicy, LoanRequest};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One period of a repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    // Timing
    pub period: u32,
    pub loan_year: u32,
    pub month_in_loan_year: u32,
    pub due_date: Option<NaiveDate>,

    // Balances
    pub opening_balance: f64,
    pub closing_balance: f64,

    // Payment split
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
}

impl ScheduleRow {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            loan_year: 1,
            month_in_loan_year: 1,
            due_date: None,
            opening_balance: 0.0,
            closing_balance: 0.0,
            payment: 0.0,
            interest: 0.0,
            principal: 0.0,
        }
    }
}

/// Complete schedule for one loan under one policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub request: LoanRequest,
    pub policy: AmortizationPolicy,

    /// Period rows; empty when the engine ran without detailed output
    pub rows: Vec<ScheduleRow>,

    periods: u32,
    total_payment: f64,
    total_interest: f64,
    total_principal: f64,
    first_payment: f64,
    last_payment: f64,
    final_balance: f64,
}

impl RepaymentSchedule {
    pub fn new(request: LoanRequest, policy: AmortizationPolicy) -> Self {
        Self {
            request,
            policy,
            rows: Vec::new(),
            periods: 0,
            total_payment: 0.0,
            total_interest: 0.0,
            total_principal: 0.0,
            first_payment: 0.0,
            last_payment: 0.0,
            final_balance: request.principal,
        }
    }

    /// Accumulate a row into the totals, keeping it only when `keep` is set
    pub fn add_row(&mut self, row: ScheduleRow, keep: bool) {
        if self.periods == 0 {
            self.first_payment = row.payment;
        }
        self.periods += 1;
        self.total_payment += row.payment;
        self.total_interest += row.interest;
        self.total_principal += row.principal;
        self.last_payment = row.payment;
        self.final_balance = row.closing_balance;

        if keep {
            self.rows.push(row);
        }
    }

    /// Payment amounts in period order (empty without detailed output)
    pub fn payments(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.payment).collect()
    }

    /// Write the period rows as CSV with a header line
    pub fn write_csv<W: Write>(&self, writer: W) -> LoanResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            policy: self.policy,
            total_periods: self.periods,
            total_payment: self.total_payment,
            total_interest: self.total_interest,
            total_principal: self.total_principal,
            first_payment: self.first_payment,
            last_payment: self.last_payment,
            final_balance: self.final_balance,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub policy: AmortizationPolicy,
    pub total_periods: u32,
    pub total_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub first_payment: f64,
    pub last_payment: f64,
    pub final_balance: f64,
}
