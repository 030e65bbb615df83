//! Schedule engine producing period-by-period repayment rows

use super::calculator::{annuity_payment, differentiated_interest};
use super::schedule::{RepaymentSchedule, ScheduleRow};
use super::state::ScheduleState;
use crate::error::{LoanError, LoanResult};
use crate::loan::{AmortizationPolicy, LoanRequest};
use chrono::NaiveDate;

/// Configuration for a schedule run
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Due date of the first payment; later periods follow monthly
    pub first_payment_date: Option<NaiveDate>,

    /// Whether to keep every period row (totals are always tracked)
    pub detailed_output: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            first_payment_date: None,
            detailed_output: true,
        }
    }
}

/// Builds repayment schedules for a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: ScheduleConfig,
}

impl ScheduleEngine {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Build the full schedule for a single loan
    pub fn build(&self, request: &LoanRequest, policy: AmortizationPolicy) -> LoanResult<RepaymentSchedule> {
        request.validate(policy)?;

        let mut schedule = RepaymentSchedule::new(*request, policy);
        let mut state = ScheduleState::from_request(request, self.config.first_payment_date);

        let level_payment = match policy {
            AmortizationPolicy::Annuity => {
                annuity_payment(request.principal, request.monthly_rate(), request.term_months)
            }
            AmortizationPolicy::Differentiated | AmortizationPolicy::InterestFree => {
                request.principal / request.term_months as f64
            }
        };

        for _period in 1..=request.term_months {
            state.advance_period(request);

            let row = self.calculate_period(request, policy, level_payment, &mut state);
            schedule.add_row(row, self.config.detailed_output);
        }

        log::debug!(
            "Built {} schedule: {} periods, final balance {:.6}",
            policy,
            request.term_months,
            state.opening_balance,
        );

        if !schedule.summary().total_payment.is_finite() {
            return Err(LoanError::invalid("principal", request.principal, "repayment figures overflow"));
        }

        Ok(schedule)
    }

    /// Split one period's payment into interest and principal
    fn calculate_period(
        &self,
        request: &LoanRequest,
        policy: AmortizationPolicy,
        level_payment: f64,
        state: &mut ScheduleState,
    ) -> ScheduleRow {
        let mut row = ScheduleRow::new(state.period);

        row.loan_year = state.loan_year;
        row.month_in_loan_year = state.month_in_loan_year;
        row.due_date = state.due_date;
        row.opening_balance = state.opening_balance;

        match policy {
            AmortizationPolicy::Annuity => {
                row.payment = level_payment;
                row.interest = state.opening_balance * request.monthly_rate();
                row.principal = level_payment - row.interest;
            }
            AmortizationPolicy::Differentiated => {
                // level_payment is the constant principal portion here
                row.principal = level_payment;
                row.interest = differentiated_interest(
                    request.principal,
                    request.monthly_rate(),
                    request.term_months,
                    state.period,
                );
                row.payment = row.principal + row.interest;
            }
            AmortizationPolicy::InterestFree => {
                row.payment = level_payment;
                row.interest = 0.0;
                row.principal = level_payment;
            }
        }

        row.closing_balance = state.repay(row.principal);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::compute;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_schedule_runs() {
        let engine = ScheduleEngine::default();
        let request = LoanRequest::new(120_000.0, 12.0, 12);

        let schedule = engine.build(&request, AmortizationPolicy::Annuity).unwrap();

        assert_eq!(schedule.rows.len(), 12);
        assert_eq!(schedule.rows[0].opening_balance, 120_000.0);
        assert_abs_diff_eq!(schedule.rows[0].interest, 1_200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.rows[11].closing_balance, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_schedule_totals_match_compute() {
        let engine = ScheduleEngine::default();
        let requests = [
            LoanRequest::new(120_000.0, 12.0, 12),
            LoanRequest::new(250_000.0, 7.5, 240),
            LoanRequest::new(15_000.0, 0.0, 18),
        ];

        for request in &requests {
            for policy in AmortizationPolicy::ALL {
                let result = compute(request, policy).unwrap();
                let summary = engine.build(request, policy).unwrap().summary();

                assert_eq!(summary.total_periods, request.term_months);
                assert_abs_diff_eq!(summary.total_payment, result.total_amount, epsilon = 1e-6);
                assert_abs_diff_eq!(summary.total_interest, result.total_overpayment, epsilon = 1e-6);
                assert_abs_diff_eq!(summary.total_principal, request.principal, epsilon = 1e-6);
                assert_abs_diff_eq!(summary.first_payment, result.periodic_payment, epsilon = 1e-9);
                assert_abs_diff_eq!(summary.final_balance, 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_differentiated_rows() {
        let engine = ScheduleEngine::default();
        let request = LoanRequest::new(120_000.0, 12.0, 12);
        let schedule = engine.build(&request, AmortizationPolicy::Differentiated).unwrap();

        assert_abs_diff_eq!(schedule.rows[0].payment, 11_100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.rows[11].payment, 10_000.0, epsilon = 1e-9);
        assert!(schedule.rows.iter().all(|r| (r.principal - 10_000.0).abs() < 1e-9));

        // Interest is charged on the balance after the period's principal
        for row in &schedule.rows {
            assert_abs_diff_eq!(row.interest, row.closing_balance * 0.01, epsilon = 1e-6);
        }

        let payments = schedule.payments();
        assert!(payments.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_annuity_split_shifts_to_principal() {
        let engine = ScheduleEngine::default();
        let request = LoanRequest::new(200_000.0, 6.0, 120);
        let schedule = engine.build(&request, AmortizationPolicy::Annuity).unwrap();

        let first = &schedule.rows[0];
        let last = schedule.rows.last().unwrap();
        assert_eq!(first.payment, last.payment);
        assert!(first.interest > last.interest);
        assert!(first.principal < last.principal);
    }

    #[test]
    fn test_due_dates_and_timing() {
        let engine = ScheduleEngine::new(ScheduleConfig {
            first_payment_date: NaiveDate::from_ymd_opt(2025, 11, 15),
            ..Default::default()
        });
        let request = LoanRequest::new(24_000.0, 10.0, 24);
        let schedule = engine.build(&request, AmortizationPolicy::InterestFree).unwrap();

        assert_eq!(schedule.rows[0].due_date, NaiveDate::from_ymd_opt(2025, 11, 15));
        assert_eq!(schedule.rows[2].due_date, NaiveDate::from_ymd_opt(2026, 1, 15));
        assert_eq!(schedule.rows[23].due_date, NaiveDate::from_ymd_opt(2027, 10, 15));
        assert_eq!(schedule.rows[12].loan_year, 2);
        assert_eq!(schedule.rows[12].month_in_loan_year, 1);
        assert!(schedule.rows.iter().all(|r| r.interest == 0.0 && r.payment == 1_000.0));
    }

    #[test]
    fn test_summary_only_output() {
        let engine = ScheduleEngine::new(ScheduleConfig {
            detailed_output: false,
            ..Default::default()
        });
        let request = LoanRequest::new(120_000.0, 12.0, 12);
        let schedule = engine.build(&request, AmortizationPolicy::Differentiated).unwrap();

        assert!(schedule.rows.is_empty());
        let summary = schedule.summary();
        assert_eq!(summary.total_periods, 12);
        assert_abs_diff_eq!(summary.total_interest, 6_600.0, epsilon = 1e-6);
        assert_abs_diff_eq!(summary.last_payment, 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let engine = ScheduleEngine::default();
        let request = LoanRequest::new(1_000.0, 5.0, 0);
        assert!(engine.build(&request, AmortizationPolicy::Annuity).is_err());
    }

    #[test]
    fn test_overflowing_schedule_rejected() {
        let engine = ScheduleEngine::default();
        let request = LoanRequest::new(1.79e308, 12.0, 12);
        assert!(matches!(
            engine.build(&request, AmortizationPolicy::Annuity),
            Err(LoanError::InvalidInput { field: "principal", .. })
        ));
    }

    #[test]
    fn test_write_csv() {
        let engine = ScheduleEngine::new(ScheduleConfig {
            first_payment_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            ..Default::default()
        });
        let request = LoanRequest::new(1_200.0, 0.0, 3);
        let schedule = engine.build(&request, AmortizationPolicy::InterestFree).unwrap();

        let mut buffer = Vec::new();
        schedule.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "period,loan_year,month_in_loan_year,due_date,opening_balance,closing_balance,payment,interest,principal"
        );
        assert!(lines[1].starts_with("1,1,1,2026-01-01,1200.0,800.0,400.0,0.0,400.0"));
    }
}
