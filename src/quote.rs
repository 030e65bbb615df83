//! Quote runner for single loans, policy comparisons and parallel batches
//!
//! Holds one schedule engine and reuses it across any number of requests.

use crate::amortization::{
    compute, effective_annual_rate, PaymentResult, RepaymentSchedule, ScheduleConfig, ScheduleEngine,
};
use crate::error::{LoanError, LoanResult};
use crate::loan::{AmortizationPolicy, LoanRecord, LoanRequest};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Payment figures for one policy plus the borrower's effective annual rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyQuote {
    pub policy: AmortizationPolicy,

    #[serde(flatten)]
    pub result: PaymentResult,

    /// Effective annual rate in percent; `None` when no rate can be solved
    pub effective_annual_rate_pct: Option<f64>,
}

/// Flat output row for batch runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub loan_id: String,
    pub policy: AmortizationPolicy,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub periodic_payment: f64,
    pub total_overpayment: f64,
    pub total_amount: f64,
    pub effective_annual_rate_pct: Option<f64>,
}

/// Reusable runner for quotes
///
/// # Example
/// ```ignore
/// let runner = QuoteRunner::new();
/// let request = LoanRequest::new(120_000.0, 12.0, 12);
/// for quote in runner.compare_policies(&request)? {
///     println!("{}: {:.2}", quote.policy, quote.result.periodic_payment);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuoteRunner {
    engine: ScheduleEngine,
}

impl QuoteRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner whose schedules carry the given configuration
    pub fn with_config(config: ScheduleConfig) -> Self {
        Self {
            engine: ScheduleEngine::new(config),
        }
    }

    /// Quote a single loan under one policy
    pub fn quote(&self, request: &LoanRequest, policy: AmortizationPolicy) -> LoanResult<PolicyQuote> {
        self.quote_with_schedule(request, policy).map(|(quote, _)| quote)
    }

    /// Quote a single loan and hand back the schedule the effective rate was solved from
    pub fn quote_with_schedule(
        &self,
        request: &LoanRequest,
        policy: AmortizationPolicy,
    ) -> LoanResult<(PolicyQuote, RepaymentSchedule)> {
        let result = compute(request, policy)?;
        let schedule = self.engine.build(request, policy)?;

        let quote = PolicyQuote {
            policy,
            result,
            effective_annual_rate_pct: effective_annual_rate(&schedule).map(|r| r * 100.0),
        };
        Ok((quote, schedule))
    }

    /// Quote the same loan under every policy, in [`AmortizationPolicy::ALL`] order
    pub fn compare_policies(&self, request: &LoanRequest) -> LoanResult<Vec<PolicyQuote>> {
        AmortizationPolicy::ALL
            .iter()
            .map(|&policy| self.quote(request, policy))
            .collect()
    }

    /// Quote every record in parallel, preserving input order.
    ///
    /// Failures are reported per record and tagged with the loan id.
    pub fn run_batch(&self, records: &[LoanRecord]) -> Vec<LoanResult<BatchResult>> {
        records
            .par_iter()
            .map(|record| {
                self.quote(&record.request, record.policy)
                    .map(|quote| BatchResult {
                        loan_id: record.loan_id.clone(),
                        policy: record.policy,
                        principal: record.request.principal,
                        annual_rate_percent: record.request.annual_rate_percent,
                        term_months: record.request.term_months,
                        periodic_payment: quote.result.periodic_payment,
                        total_overpayment: quote.result.total_overpayment,
                        total_amount: quote.result.total_amount,
                        effective_annual_rate_pct: quote.effective_annual_rate_pct,
                    })
                    .map_err(|e| LoanError::Record {
                        loan_id: record.loan_id.clone(),
                        source: Box::new(e),
                    })
            })
            .collect()
    }
}

/// Write batch results as CSV with a header line
pub fn write_batch_results<W: Write>(results: &[BatchResult], writer: W) -> LoanResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(result)?;
    }
    csv_writer.flush()?;
    Ok(())
}
