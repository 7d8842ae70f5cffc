use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_amount;
use super::loan::LoanId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    LoanFunded,
    LoanReceived,
    Repayment,
    InterestPayment,
    Unknown(String),
}

impl TransactionKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::LoanFunded => "loan_funded",
            TransactionKind::LoanReceived => "loan_received",
            TransactionKind::Repayment => "repayment",
            TransactionKind::InterestPayment => "interest_payment",
            TransactionKind::Unknown(raw) => raw,
        }
    }

    /// Money leaving the user's wallet.
    pub fn is_outgoing(&self) -> bool {
        matches!(
            self,
            TransactionKind::Withdrawal | TransactionKind::LoanFunded | TransactionKind::Repayment
        )
    }
}

impl From<String> for TransactionKind {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().replace('-', "_").as_str() {
            "deposit" => TransactionKind::Deposit,
            "withdrawal" => TransactionKind::Withdrawal,
            "loan_funded" | "funding" => TransactionKind::LoanFunded,
            "loan_received" | "borrow" => TransactionKind::LoanReceived,
            "repayment" => TransactionKind::Repayment,
            "interest_payment" | "interest" => TransactionKind::InterestPayment,
            _ => TransactionKind::Unknown(raw),
        }
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(default)]
    pub loan_id: Option<LoanId>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "createdAt")]
    pub timestamp: DateTime<Utc>,
}
