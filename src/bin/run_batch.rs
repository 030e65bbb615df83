//! Quote an entire loan book from CSV
//!
//! Usage: cargo run --bin run_batch -- --input data/loans.csv --output loan_results.csv

use anyhow::{Context, Result};
use clap::Parser;
use credit_calculator::loan::{load_loans, loader::DEFAULT_LOANS_PATH};
use credit_calculator::quote::write_batch_results;
use credit_calculator::{BatchResult, QuoteRunner};
use std::fs::File;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Quote every loan in a CSV file")]
struct Args {
    /// Input CSV (LoanID,Principal,AnnualRatePercent,TermMonths,Policy)
    #[arg(long, env = "LOAN_BATCH_INPUT", default_value = DEFAULT_LOANS_PATH)]
    input: String,

    /// Output CSV
    #[arg(long, env = "LOAN_BATCH_OUTPUT", default_value = "loan_results.csv")]
    output: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading loans from {}...", args.input);

    let records = load_loans(&args.input).with_context(|| format!("Failed to load {}", args.input))?;
    println!("Loaded {} loans in {:?}", records.len(), start.elapsed());

    println!("Running quotes...");
    let quote_start = Instant::now();
    let results = QuoteRunner::new().run_batch(&records);
    println!("Quotes complete in {:?}", quote_start.elapsed());

    let mut quoted: Vec<BatchResult> = Vec::with_capacity(results.len());
    let mut rejected = 0usize;
    for result in results {
        match result {
            Ok(row) => quoted.push(row),
            Err(e) => {
                log::warn!("{}", e);
                rejected += 1;
            }
        }
    }

    let file = File::create(&args.output).with_context(|| format!("Failed to create {}", args.output))?;
    write_batch_results(&quoted, file)?;
    println!("Output written to {}", args.output);

    let total_principal: f64 = quoted.iter().map(|r| r.principal).sum();
    let total_overpayment: f64 = quoted.iter().map(|r| r.total_overpayment).sum();
    let total_amount: f64 = quoted.iter().map(|r| r.total_amount).sum();

    println!("\nBatch Summary:");
    println!("  Quoted:            {}", quoted.len());
    println!("  Rejected:          {}", rejected);
    println!("  Total principal:   ${:.2}", total_principal);
    println!("  Total overpayment: ${:.2}", total_overpayment);
    println!("  Total repaid:      ${:.2}", total_amount);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
