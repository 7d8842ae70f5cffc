use log::warn;

use crate::error::{Error, Result};
use crate::models::{LoanStatus, LoanType, TransactionKind};

pub const UNKNOWN_BADGE_CLASS: &str = "badge-unknown";

pub fn loan_type_class(loan_type: LoanType) -> &'static str {
    match loan_type {
        LoanType::Request => "loan-type-request",
        LoanType::Offer => "loan-type-offer",
    }
}

/// Badge class for a loan status. Statuses the client does not know are an
/// error so the caller has to decide how to surface them.
pub fn loan_status_badge_class(status: &LoanStatus) -> Result<&'static str> {
    match status {
        LoanStatus::Pending => Ok("badge-warning"),
        LoanStatus::Active => Ok("badge-success"),
        LoanStatus::Completed | LoanStatus::Repaid => Ok("badge-info"),
        LoanStatus::Defaulted => Ok("badge-destructive"),
        LoanStatus::Cancelled => Ok("badge-muted"),
        LoanStatus::Unknown(raw) => Err(Error::UnknownVariant {
            kind: "loan status",
            value: raw.clone(),
        }),
    }
}

/// Renderer-side lookup: unknown statuses are reported and shown with a
/// neutral badge instead of an empty one.
pub fn status_badge_or_report(status: &LoanStatus) -> &'static str {
    loan_status_badge_class(status).unwrap_or_else(|e| {
        warn!("{}", e);
        UNKNOWN_BADGE_CLASS
    })
}

pub fn transaction_kind_label(kind: &TransactionKind) -> String {
    match kind {
        TransactionKind::Deposit => "Deposit".to_string(),
        TransactionKind::Withdrawal => "Withdrawal".to_string(),
        TransactionKind::LoanFunded => "Loan Funded".to_string(),
        TransactionKind::LoanReceived => "Loan Received".to_string(),
        TransactionKind::Repayment => "Repayment".to_string(),
        TransactionKind::InterestPayment => "Interest Payment".to_string(),
        TransactionKind::Unknown(raw) => super::format::capitalize(&raw.replace('_', " ")),
    }
}
