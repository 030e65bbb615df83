//! Loan request and amortization policy types

use crate::error::{LoanError, LoanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest accepted term: 100 years of monthly payments
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Repayment policy selecting which formula set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationPolicy {
    /// Constant total payment every period
    Annuity,
    /// Constant principal portion, interest shrinking with the balance
    Differentiated,
    /// No interest at all; principal split evenly over the term
    #[serde(alias = "installment", alias = "interest-free")]
    InterestFree,
}

impl AmortizationPolicy {
    /// Every policy, in display order
    pub const ALL: [AmortizationPolicy; 3] = [
        AmortizationPolicy::Annuity,
        AmortizationPolicy::Differentiated,
        AmortizationPolicy::InterestFree,
    ];

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            AmortizationPolicy::Annuity => "annuity",
            AmortizationPolicy::Differentiated => "differentiated",
            AmortizationPolicy::InterestFree => "interest_free",
        }
    }

    /// Whether the annual rate enters this policy's formulas
    pub fn uses_rate(&self) -> bool {
        !matches!(self, AmortizationPolicy::InterestFree)
    }
}

impl fmt::Display for AmortizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmortizationPolicy {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annuity" => Ok(AmortizationPolicy::Annuity),
            "differentiated" => Ok(AmortizationPolicy::Differentiated),
            "interest_free" | "interest-free" | "installment" => Ok(AmortizationPolicy::InterestFree),
            _ => Err(LoanError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Inputs for a single calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual rate in percent (12.0 means 12%)
    pub annual_rate_percent: f64,

    /// Number of monthly periods
    pub term_months: u32,
}

impl LoanRequest {
    pub fn new(principal: f64, annual_rate_percent: f64, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
        }
    }

    /// Per-period compounding rate: annual percent / 12 / 100
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 12.0 / 100.0
    }

    /// Check the request against what `policy` needs.
    ///
    /// The rate is only checked for policies that use it, so an interest-free
    /// request accepts any rate value.
    pub fn validate(&self, policy: AmortizationPolicy) -> LoanResult<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(LoanError::invalid("principal", self.principal, "must be a positive finite amount"));
        }

        if self.term_months == 0 {
            return Err(LoanError::invalid("term_months", self.term_months, "must be at least one month"));
        }

        if self.term_months > MAX_TERM_MONTHS {
            return Err(LoanError::invalid("term_months", self.term_months, "exceeds the 1200 month maximum"));
        }

        if policy.uses_rate() && (!self.annual_rate_percent.is_finite() || self.annual_rate_percent < 0.0) {
            return Err(LoanError::invalid(
                "annual_rate_percent",
                self.annual_rate_percent,
                "must be a non-negative finite percentage",
            ));
        }

        Ok(())
    }

    /// Loan year (1-indexed) containing the given period
    pub fn loan_year(&self, period: u32) -> u32 {
        period.saturating_sub(1) / 12 + 1
    }

    /// Month within the loan year (1-12) of the given period
    pub fn month_in_loan_year(&self, period: u32) -> u32 {
        period.saturating_sub(1) % 12 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("annuity".parse::<AmortizationPolicy>().unwrap(), AmortizationPolicy::Annuity);
        assert_eq!(" Differentiated ".parse::<AmortizationPolicy>().unwrap(), AmortizationPolicy::Differentiated);
        assert_eq!("installment".parse::<AmortizationPolicy>().unwrap(), AmortizationPolicy::InterestFree);
        assert_eq!("interest-free".parse::<AmortizationPolicy>().unwrap(), AmortizationPolicy::InterestFree);
        assert!(matches!(
            "balloon".parse::<AmortizationPolicy>(),
            Err(LoanError::UnknownPolicy(name)) if name == "balloon"
        ));

        for policy in AmortizationPolicy::ALL {
            assert_eq!(policy.as_str().parse::<AmortizationPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&AmortizationPolicy::InterestFree).unwrap();
        assert_eq!(json, "\"interest_free\"");

        let parsed: AmortizationPolicy = serde_json::from_str("\"installment\"").unwrap();
        assert_eq!(parsed, AmortizationPolicy::InterestFree);
    }

    #[test]
    fn test_monthly_rate() {
        let request = LoanRequest::new(120_000.0, 12.0, 12);
        assert!((request.monthly_rate() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_validation() {
        let ok = LoanRequest::new(1_000.0, 5.0, 10);
        assert!(ok.validate(AmortizationPolicy::Annuity).is_ok());

        let zero_principal = LoanRequest::new(0.0, 5.0, 10);
        assert!(matches!(
            zero_principal.validate(AmortizationPolicy::Annuity),
            Err(LoanError::InvalidInput { field: "principal", .. })
        ));

        let nan_principal = LoanRequest::new(f64::NAN, 5.0, 10);
        assert!(nan_principal.validate(AmortizationPolicy::InterestFree).is_err());

        let zero_term = LoanRequest::new(1_000.0, 5.0, 0);
        assert!(matches!(
            zero_term.validate(AmortizationPolicy::InterestFree),
            Err(LoanError::InvalidInput { field: "term_months", .. })
        ));

        let negative_rate = LoanRequest::new(1_000.0, -1.0, 10);
        assert!(matches!(
            negative_rate.validate(AmortizationPolicy::Differentiated),
            Err(LoanError::InvalidInput { field: "annual_rate_percent", .. })
        ));
        // Rate is irrelevant without interest
        assert!(negative_rate.validate(AmortizationPolicy::InterestFree).is_ok());
    }

    #[test]
    fn test_term_upper_bound() {
        let longest = LoanRequest::new(1_000.0, 5.0, MAX_TERM_MONTHS);
        assert!(longest.validate(AmortizationPolicy::Annuity).is_ok());

        for term in [MAX_TERM_MONTHS + 1, 2_000_000, u32::MAX] {
            let request = LoanRequest::new(1_000.0, 5.0, term);
            for policy in AmortizationPolicy::ALL {
                assert!(matches!(
                    request.validate(policy),
                    Err(LoanError::InvalidInput { field: "term_months", .. })
                ));
            }
        }
    }

    #[test]
    fn test_loan_timing() {
        let request = LoanRequest::new(1_000.0, 5.0, 36);

        assert_eq!(request.loan_year(1), 1);
        assert_eq!(request.month_in_loan_year(1), 1);
        assert_eq!(request.loan_year(12), 1);
        assert_eq!(request.month_in_loan_year(12), 12);
        assert_eq!(request.loan_year(13), 2);
        assert_eq!(request.month_in_loan_year(13), 1);
    }
}
