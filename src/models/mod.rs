use serde::{Deserialize, Deserializer, Serialize};

pub mod loan;
pub mod transaction;

pub use loan::{Loan, LoanId, LoanStatus, LoanType};
pub use transaction::{Transaction, TransactionKind};

/// Aggregate counters for the signed-in user, recomputed server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_borrowed: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_lent: f64,
    #[serde(default)]
    pub active_loans: u32,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub interest_earned: f64,
}

/// Decimal columns arrive either as JSON numbers or as strings ("0.50000000").
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount {:?}: {}", text, e))),
    }
}
