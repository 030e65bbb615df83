//! Error types for loan calculations

use thiserror::Error;

/// Result alias used throughout the crate
pub type LoanResult<T> = Result<T, LoanError>;

/// Errors raised while validating, computing or loading loans
#[derive(Error, Debug)]
pub enum LoanError {
    /// A request field is outside its valid domain
    #[error("Invalid {field}: {value} - {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value, rendered for display
        value: String,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// Policy name did not match any amortization policy
    #[error("Unknown amortization policy: {0}")]
    UnknownPolicy(String),

    /// Malformed CSV input or output
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File or stream failure while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A batch record failed; `loan_id` identifies the input row
    #[error("Loan {loan_id}: {source}")]
    Record {
        loan_id: String,
        #[source]
        source: Box<LoanError>,
    },
}

impl LoanError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        LoanError::InvalidInput {
            field,
            value: value.to_string(),
            reason,
        }
    }

    /// True for errors caused by caller-supplied values (as opposed to I/O)
    pub fn is_input_error(&self) -> bool {
        match self {
            LoanError::InvalidInput { .. } | LoanError::UnknownPolicy(_) => true,
            LoanError::Record { source, .. } => source.is_input_error(),
            LoanError::Csv(_) | LoanError::Io(_) => false,
        }
    }
}
