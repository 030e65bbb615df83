//! AWS Lambda handler for loan quotes
//!
//! Accepts a loan as JSON and returns payment, overpayment and total amount,
//! optionally with the full schedule or a comparison across policies.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use chrono::NaiveDate;
use credit_calculator::{
    AmortizationPolicy, LoanRequest, LoanResult, PolicyQuote, QuoteRunner, ScheduleConfig, ScheduleRow,
};
use lambda_http::{run, service_fn, Body, Request, Response};
use lambda_runtime::Error;
use serde::{Deserialize, Serialize};

/// Input for a quote
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub principal: f64,

    /// Nominal annual rate in percent (default: 0)
    #[serde(default)]
    pub annual_rate_percent: f64,

    pub term_months: u32,

    /// Amortization policy (default: annuity)
    #[serde(default = "default_policy")]
    pub policy: AmortizationPolicy,

    /// Include every period row in the response
    #[serde(default)]
    pub include_schedule: bool,

    /// Due date of the first payment, YYYY-MM-DD
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,

    /// Also quote the loan under every policy
    #[serde(default)]
    pub compare: bool,
}

fn default_policy() -> AmortizationPolicy { AmortizationPolicy::Annuity }

/// Output of a quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub policy: AmortizationPolicy,
    pub periodic_payment: f64,
    pub total_overpayment: f64,
    pub total_amount: f64,
    pub effective_annual_rate_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Vec<PolicyQuote>>,
    pub execution_time_ms: u64,
}

fn process(request: &QuoteRequest) -> LoanResult<QuoteResponse> {
    let start = std::time::Instant::now();

    let loan = LoanRequest::new(request.principal, request.annual_rate_percent, request.term_months);
    let runner = QuoteRunner::with_config(ScheduleConfig {
        first_payment_date: request.first_payment_date,
        detailed_output: true,
    });

    let (quote, schedule) = runner.quote_with_schedule(&loan, request.policy)?;
    let schedule = request.include_schedule.then_some(schedule.rows);

    let comparison = if request.compare {
        Some(runner.compare_policies(&loan)?)
    } else {
        None
    };

    Ok(QuoteResponse {
        policy: quote.policy,
        periodic_payment: quote.result.periodic_payment,
        total_overpayment: quote.result.total_overpayment,
        total_amount: quote.result.total_amount,
        effective_annual_rate_pct: quote.effective_annual_rate_pct,
        schedule,
        comparison,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message });
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body.to_string()))?)
}

fn json_response(body: &QuoteResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: QuoteRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    match process(&request) {
        Ok(response) => json_response(&response),
        Err(e) if e.is_input_error() => error_response(400, &e.to_string()),
        Err(e) => {
            log::error!("Quote failed: {}", e);
            error_response(500, &e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
