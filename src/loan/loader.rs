//! Load loan records from CSV

use super::{AmortizationPolicy, LoanRequest};
use crate::error::{LoanError, LoanResult};
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the batch input file
pub const DEFAULT_LOANS_PATH: &str = "data/loans.csv";

/// Raw CSV row matching the loans file columns
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "LoanID")]
    loan_id: String,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "AnnualRatePercent")]
    annual_rate_percent: f64,
    #[serde(rename = "TermMonths")]
    term_months: u32,
    #[serde(rename = "Policy")]
    policy: String,
}

impl CsvRow {
    fn into_record(self) -> LoanResult<LoanRecord> {
        let policy = self.policy.parse::<AmortizationPolicy>().map_err(|e| LoanError::Record {
            loan_id: self.loan_id.clone(),
            source: Box::new(e),
        })?;

        Ok(LoanRecord {
            loan_id: self.loan_id,
            request: LoanRequest::new(self.principal, self.annual_rate_percent, self.term_months),
            policy,
        })
    }
}

/// One loan to evaluate: request plus the policy it should be priced under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: String,
    pub request: LoanRequest,
    pub policy: AmortizationPolicy,
}

/// Load all loan records from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> LoanResult<Vec<LoanRecord>> {
    let reader = Reader::from_path(path)?;
    collect_records(reader)
}

/// Load loan records from any reader (e.g., string buffer, request body)
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> LoanResult<Vec<LoanRecord>> {
    collect_records(Reader::from_reader(reader))
}

fn collect_records<R: std::io::Read>(mut reader: Reader<R>) -> LoanResult<Vec<LoanRecord>> {
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into_record()?);
    }

    log::debug!("Loaded {} loan records", records.len());
    Ok(records)
}
