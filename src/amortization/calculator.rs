//! Payment formulas for each amortization policy

use crate::error::{LoanError, LoanResult};
use crate::loan::{AmortizationPolicy, LoanRequest};
use serde::{Deserialize, Serialize};

/// Headline figures for one loan under one policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Constant payment for annuity and interest-free loans;
    /// first-period payment for differentiated loans
    pub periodic_payment: f64,

    /// Interest paid over the life of the loan
    pub total_overpayment: f64,

    /// Sum of all payments
    pub total_amount: f64,
}

impl PaymentResult {
    pub fn is_finite(&self) -> bool {
        self.periodic_payment.is_finite() && self.total_overpayment.is_finite() && self.total_amount.is_finite()
    }
}

/// Compute payment, overpayment and total repaid for `request` under `policy`.
///
/// Inputs are validated first; see [`LoanRequest::validate`].
pub fn compute(request: &LoanRequest, policy: AmortizationPolicy) -> LoanResult<PaymentResult> {
    request.validate(policy)?;

    let result = match policy {
        AmortizationPolicy::Annuity => annuity(request),
        AmortizationPolicy::Differentiated => differentiated(request),
        AmortizationPolicy::InterestFree => interest_free(request),
    };

    if !result.is_finite() {
        return Err(LoanError::invalid("principal", request.principal, "repayment figures overflow"));
    }

    log::debug!(
        "{} {:.2} @ {}% x {}m -> payment {:.2}, total {:.2}",
        policy,
        request.principal,
        request.annual_rate_percent,
        request.term_months,
        result.periodic_payment,
        result.total_amount,
    );

    Ok(result)
}

/// Scalar entry point taking the policy by name
pub fn calculate(
    principal: f64,
    annual_rate_percent: f64,
    term_months: u32,
    policy: &str,
) -> LoanResult<PaymentResult> {
    let policy = policy.parse::<AmortizationPolicy>()?;
    compute(&LoanRequest::new(principal, annual_rate_percent, term_months), policy)
}

/// Level annuity payment; falls back to straight division when the rate is zero.
///
/// `1 - (1 + r)^-n` is evaluated as `-expm1(-n * ln1p(r))` so tiny rates keep
/// their precision. The payment never drops below `principal / n`.
pub fn annuity_payment(principal: f64, monthly_rate: f64, term_months: u32) -> f64 {
    let n = term_months as f64;
    let straight = principal / n;
    if monthly_rate == 0.0 {
        return straight;
    }
    let discount = -(-n * monthly_rate.ln_1p()).exp_m1();
    (principal * monthly_rate / discount).max(straight)
}

/// Interest portion of period `period` (1-indexed) for a differentiated loan.
///
/// Interest accrues on the balance left after the period's principal is repaid,
/// so the final period carries no interest.
pub fn differentiated_interest(principal: f64, monthly_rate: f64, term_months: u32, period: u32) -> f64 {
    let n = term_months as f64;
    principal * monthly_rate * (n - period as f64) / n
}

/// Total payment of period `period` (1-indexed) for a differentiated loan
pub fn differentiated_payment(principal: f64, monthly_rate: f64, term_months: u32, period: u32) -> f64 {
    principal / term_months as f64 + differentiated_interest(principal, monthly_rate, term_months, period)
}

fn annuity(request: &LoanRequest) -> PaymentResult {
    let payment = annuity_payment(request.principal, request.monthly_rate(), request.term_months);
    let total_amount = payment * request.term_months as f64;

    PaymentResult {
        periodic_payment: payment,
        total_overpayment: (total_amount - request.principal).max(0.0),
        total_amount,
    }
}

fn differentiated(request: &LoanRequest) -> PaymentResult {
    let r = request.monthly_rate();
    let n = request.term_months;

    let total_amount: f64 = (1..=n)
        .map(|m| differentiated_payment(request.principal, r, n, m))
        .sum();

    PaymentResult {
        periodic_payment: differentiated_payment(request.principal, r, n, 1),
        total_overpayment: (total_amount - request.principal).max(0.0),
        total_amount,
    }
}

fn interest_free(request: &LoanRequest) -> PaymentResult {
    let payment = request.principal / request.term_months as f64;

    PaymentResult {
        periodic_payment: payment,
        total_overpayment: 0.0,
        total_amount: payment * request.term_months as f64,
    }
}
