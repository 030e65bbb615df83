//! Credit Calculator CLI
//!
//! Command-line interface for quoting a single loan

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use credit_calculator::{AmortizationPolicy, LoanRequest, QuoteRunner, ScheduleConfig};
use std::fs::File;

#[derive(Debug, Parser)]
#[command(name = "credit_calculator", version, about = "Loan repayment calculator")]
struct Args {
    /// Amount borrowed
    #[arg(long, env = "LOAN_PRINCIPAL")]
    principal: f64,

    /// Nominal annual interest rate in percent (12 means 12%)
    #[arg(long, env = "LOAN_ANNUAL_RATE", default_value_t = 0.0, allow_negative_numbers = true)]
    rate: f64,

    /// Term in months
    #[arg(long, env = "LOAN_TERM_MONTHS")]
    months: u32,

    /// annuity, differentiated or interest_free
    #[arg(long, env = "LOAN_POLICY", default_value = "annuity")]
    policy: AmortizationPolicy,

    /// Due date of the first payment (YYYY-MM-DD)
    #[arg(long, env = "LOAN_FIRST_PAYMENT_DATE")]
    first_payment_date: Option<NaiveDate>,

    /// Print the period-by-period schedule
    #[arg(long)]
    schedule: bool,

    /// Quote every policy side by side
    #[arg(long)]
    compare: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write the full schedule to this CSV file
    #[arg(long)]
    csv: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let request = LoanRequest::new(args.principal, args.rate, args.months);
    let runner = QuoteRunner::with_config(ScheduleConfig {
        first_payment_date: args.first_payment_date,
        detailed_output: true,
    });

    if args.compare {
        let quotes = runner.compare_policies(&request).context("Failed to compare policies")?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&quotes)?);
            return Ok(());
        }

        println!("{:<16} {:>14} {:>14} {:>14} {:>10}", "Policy", "Payment", "Overpayment", "Total", "EAR %");
        println!("{}", "-".repeat(72));
        for quote in &quotes {
            println!(
                "{:<16} {:>14.2} {:>14.2} {:>14.2} {:>10}",
                quote.policy.as_str(),
                quote.result.periodic_payment,
                quote.result.total_overpayment,
                quote.result.total_amount,
                format_rate(quote.effective_annual_rate_pct),
            );
        }
        return Ok(());
    }

    let (quote, schedule) = runner
        .quote_with_schedule(&request, args.policy)
        .context("Failed to quote loan")?;

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path))?;
        schedule.write_csv(file)?;
        log::info!("Schedule written to {}", path);
    }

    if args.json {
        let rows = args.schedule.then_some(&schedule.rows);
        let body = serde_json::json!({
            "quote": quote,
            "schedule": rows,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("Loan: {:.2} at {}% for {} months ({})", request.principal, request.annual_rate_percent, request.term_months, args.policy);
    let label = match args.policy {
        AmortizationPolicy::Differentiated => "First payment",
        AmortizationPolicy::Annuity | AmortizationPolicy::InterestFree => "Monthly payment",
    };
    println!("  {:<18} {:>14.2}", label, quote.result.periodic_payment);
    println!("  {:<18} {:>14.2}", "Overpayment", quote.result.total_overpayment);
    println!("  {:<18} {:>14.2}", "Total amount", quote.result.total_amount);
    println!("  {:<18} {:>14}", "Effective rate %", format_rate(quote.effective_annual_rate_pct));

    if args.schedule {
        println!();
        println!("{:>6} {:>12} {:>14} {:>12} {:>12} {:>12} {:>14}",
            "Period", "Due", "Opening", "Payment", "Interest", "Principal", "Closing");
        println!("{}", "-".repeat(88));
        for row in &schedule.rows {
            let due = row.due_date.map(|d| d.to_string()).unwrap_or_default();
            println!("{:>6} {:>12} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                row.period,
                due,
                row.opening_balance,
                row.payment,
                row.interest,
                row.principal,
                row.closing_balance.max(0.0),
            );
        }
    }

    Ok(())
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.4}", r)).unwrap_or_else(|| "n/a".to_string())
}
