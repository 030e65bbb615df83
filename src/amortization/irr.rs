//! Internal Rate of Return (IRR) calculation
//!
//! Used to express the true annual cost of a repayment schedule

use super::schedule::RepaymentSchedule;

/// Calculate the Internal Rate of Return (IRR) for a series of cash flows
/// using the Newton-Raphson method.
///
/// # Arguments
/// * `cashflows` - Cash flows, first at time zero (positive = inflow, negative = outflow)
/// * `periods_per_year` - Number of periods per year (12 for monthly)
///
/// # Returns
/// * `Option<f64>` - Annual IRR as a decimal (e.g., 0.05 for 5%), or None if no solution found
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return Some(0.0);
    }

    // At least one sign change is required for an IRR to exist
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.05 / periods_per_year as f64;
    let tolerance = 1e-12;
    let max_iterations = 1000;

    for _ in 0..max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 {
            return calculate_irr_bisection(cashflows, periods_per_year);
        }

        let new_rate = (rate - npv / dnpv).clamp(-0.99, 10.0);

        if (new_rate - rate).abs() < tolerance {
            return Some(annualize(new_rate, periods_per_year));
        }

        rate = new_rate;
    }

    log::debug!("Newton-Raphson did not converge, falling back to bisection");
    calculate_irr_bisection(cashflows, periods_per_year)
}

/// Effective annual rate paid by the borrower on a schedule.
///
/// Cash flows are the principal received at time zero followed by each
/// period's payment. Requires a schedule built with detailed output.
pub fn effective_annual_rate(schedule: &RepaymentSchedule) -> Option<f64> {
    let cashflows = borrower_cashflows(schedule)?;
    calculate_irr(&cashflows, 12)
}

/// `[+principal, -payment(1), ..., -payment(n)]`, or `None` without rows
fn borrower_cashflows(schedule: &RepaymentSchedule) -> Option<Vec<f64>> {
    if schedule.rows.is_empty() {
        return None;
    }

    let mut cashflows = Vec::with_capacity(schedule.rows.len() + 1);
    cashflows.push(schedule.request.principal);
    cashflows.extend(schedule.rows.iter().map(|r| -r.payment));
    Some(cashflows)
}

fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

/// NPV and its derivative with respect to the periodic rate.
///
/// Discount factors are accumulated period by period, so long schedules
/// never need an integer exponent.
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let step = 1.0 / (1.0 + rate);
    let mut discount = 1.0;
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf * discount;
        // d/dr of cf * (1 + r)^-t
        dnpv -= t as f64 * cf * discount * step;
        discount *= step;
    }

    (npv, dnpv)
}

/// Bisection on the periodic rate over (-99%, 1000%), for when Newton stalls
fn calculate_irr_bisection(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    const TOLERANCE: f64 = 1e-12;

    let npv = |rate: f64| npv_and_derivative(cashflows, rate).0;

    let (mut low, mut high) = (-0.99_f64, 10.0_f64);
    let mut npv_low = npv(low);
    if npv_low * npv(high) > 0.0 {
        return None;
    }

    while (high - low) / 2.0 >= TOLERANCE {
        let mid = low + (high - low) / 2.0;
        let npv_mid = npv(mid);

        if npv_mid.abs() < TOLERANCE {
            return Some(annualize(mid, periods_per_year));
        }

        if npv_mid.signum() == npv_low.signum() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    Some(annualize(low + (high - low) / 2.0, periods_per_year))
}
