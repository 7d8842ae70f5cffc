use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::deserialize_amount;

pub type LoanId = i64;

/// Which side of the marketplace created the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    /// Borrower-initiated listing seeking funds.
    Request,
    /// Lender-initiated listing offering funds.
    Offer,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Request => "request",
            LoanType::Offer => "offer",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loan lifecycle as reported by the server.
///
/// Values the client does not know about are kept verbatim in `Unknown` so a
/// single unexpected status never fails a whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanStatus {
    Pending,
    Active,
    Completed,
    Repaid,
    Defaulted,
    Cancelled,
    Unknown(String),
}

impl LoanStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
            LoanStatus::Repaid => "repaid",
            LoanStatus::Defaulted => "defaulted",
            LoanStatus::Cancelled => "cancelled",
            LoanStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for LoanStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => LoanStatus::Pending,
            "active" => LoanStatus::Active,
            "completed" => LoanStatus::Completed,
            "repaid" => LoanStatus::Repaid,
            "defaulted" => LoanStatus::Defaulted,
            "cancelled" | "canceled" => LoanStatus::Cancelled,
            _ => LoanStatus::Unknown(raw),
        }
    }
}

impl From<LoanStatus> for String {
    fn from(status: LoanStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub interest: f64,
    pub duration_months: u32,
    pub status: LoanStatus,
    #[serde(default)]
    pub has_collateral: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_request(&self) -> bool {
        self.loan_type == LoanType::Request
    }

    pub fn is_offer(&self) -> bool {
        self.loan_type == LoanType::Offer
    }
}
