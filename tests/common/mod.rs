#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use bitlend::api::LendingApi;
use bitlend::error::{Error, Result};
use bitlend::models::{Loan, LoanId, LoanStatus, LoanType, Transaction, TransactionKind, UserStats};

pub fn create_test_loan(id: LoanId, loan_type: LoanType) -> Loan {
    Loan {
        id,
        loan_type,
        amount: 0.25,
        interest: 5.5,
        duration_months: 6,
        status: LoanStatus::Pending,
        has_collateral: true,
        created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
    }
}

pub fn create_test_transaction(id: i64, kind: TransactionKind, amount: f64) -> Transaction {
    Transaction {
        id,
        loan_id: None,
        amount,
        kind,
        description: None,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::days(id),
    }
}

/// Two requests and one offer, interleaved.
pub fn create_test_marketplace() -> Vec<Loan> {
    vec![
        create_test_loan(1, LoanType::Request),
        create_test_loan(2, LoanType::Offer),
        create_test_loan(3, LoanType::Request),
    ]
}

/// In-memory lending server with call counters.
///
/// Accepting a listed loan removes it from the marketplace. `accept_error`
/// makes every accept fail with that message instead.
#[derive(Default)]
pub struct FakeApi {
    pub stats: UserStats,
    pub active_loans: Vec<Loan>,
    pub transactions: Vec<Transaction>,
    pub marketplace: Mutex<Vec<Loan>>,
    pub accept_error: Option<String>,
    /// When set, accepts wait here until released.
    pub accept_gate: Option<Arc<Notify>>,
    /// When set, the first marketplace read snapshots the listing and then
    /// waits here before answering.
    pub marketplace_gate: Option<Arc<Notify>>,
    pub marketplace_calls: AtomicUsize,
    pub accept_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_marketplace(loans: Vec<Loan>) -> Self {
        Self {
            marketplace: Mutex::new(loans),
            ..Default::default()
        }
    }

    pub fn marketplace_calls(&self) -> usize {
        self.marketplace_calls.load(Ordering::SeqCst)
    }

    pub fn accept_calls(&self) -> usize {
        self.accept_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LendingApi for FakeApi {
    async fn get_user_stats(&self) -> Result<UserStats> {
        Ok(self.stats.clone())
    }

    async fn get_active_loans(&self) -> Result<Vec<Loan>> {
        Ok(self.active_loans.clone())
    }

    async fn get_marketplace_loans(&self) -> Result<Vec<Loan>> {
        let call = self.marketplace_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.marketplace.lock().await.clone();
        if let (0, Some(gate)) = (call, &self.marketplace_gate) {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }

    async fn accept_loan(&self, id: LoanId) -> Result<serde_json::Value> {
        self.accept_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.accept_gate {
            gate.notified().await;
        }
        if let Some(message) = &self.accept_error {
            return Err(Error::ApiError(message.clone()));
        }
        let mut loans = self.marketplace.lock().await;
        let before = loans.len();
        loans.retain(|loan| loan.id != id);
        if loans.len() == before {
            return Err(Error::NotFound(format!("404: Loan {} not found", id)));
        }
        Ok(serde_json::json!({ "id": id, "status": "active" }))
    }
}
