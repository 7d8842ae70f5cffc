use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Loan, LoanId, Transaction, UserStats};

pub mod client;

pub use client::HttpApiClient;

pub const USER_STATS_PATH: &str = "/api/user/stats";
pub const ACTIVE_LOANS_PATH: &str = "/api/loans/active";
pub const MARKETPLACE_LOANS_PATH: &str = "/api/loans/marketplace";
pub const TRANSACTIONS_PATH: &str = "/api/transactions";
pub const LOGIN_PATH: &str = "/api/auth/login";

pub fn accept_loan_path(id: LoanId) -> String {
    format!("/api/loans/{}/accept", id)
}

/// The BitLend REST surface this client consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingApi: Send + Sync {
    async fn get_user_stats(&self) -> Result<UserStats>;

    async fn get_active_loans(&self) -> Result<Vec<Loan>>;

    async fn get_marketplace_loans(&self) -> Result<Vec<Loan>>;

    async fn get_transactions(&self) -> Result<Vec<Transaction>>;

    /// Funds a loan request or takes a loan offer. The response shape is not
    /// fixed by the server, so it is handed back as raw JSON.
    async fn accept_loan(&self, id: LoanId) -> Result<serde_json::Value>;
}

/// What a successful sign-in hands back: the session cookie to replay, when
/// the server sets one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub cookie: Option<String>,
}

/// Credential check performed by the server. The client only forwards the
/// form values and keeps the resulting session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session>;
}
