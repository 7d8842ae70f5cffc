//! Mediates user intents (accept a listing, publish a new one) between the
//! lending API, the query cache and the notification queue.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::LendingApi;
use crate::error::Error;
use crate::models::{Loan, LoanId, LoanType};
use crate::notifications::{Notifier, Toast};
use crate::query::{QueryClient, QueryKey};
use crate::utils::CancellationToken;

pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to process the loan";

#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome {
    Accepted,
    Failed(String),
    /// Another accept for the same loan was still in flight; nothing was sent.
    Duplicate,
    /// The caller went away before the server answered; the answer was ignored.
    Cancelled,
}

pub fn accept_success_message(loan_type: LoanType) -> &'static str {
    match loan_type {
        LoanType::Request => "You have successfully funded this loan request.",
        LoanType::Offer => "You have successfully accepted this loan offer.",
    }
}

pub fn created_toast(loan_type: LoanType) -> Toast {
    match loan_type {
        LoanType::Request => Toast::new(
            "Request Created",
            "Your loan request has been posted to the marketplace.",
        ),
        LoanType::Offer => Toast::new(
            "Offer Created",
            "Your loan offer has been posted to the marketplace.",
        ),
    }
}

/// Removes the loan from the in-flight set however the accept ends.
struct InFlight {
    set: Arc<Mutex<HashSet<LoanId>>>,
    id: LoanId,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock_set(&self.set).remove(&self.id);
    }
}

// Never held across an await, so a blocking lock is fine. A poisoned set is
// still a valid set of ids.
fn lock_set(set: &Mutex<HashSet<LoanId>>) -> MutexGuard<'_, HashSet<LoanId>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone)]
pub struct LoanActionDispatcher {
    api: Arc<dyn LendingApi>,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
    in_flight: Arc<Mutex<HashSet<LoanId>>>,
}

impl LoanActionDispatcher {
    pub fn new(queries: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api: queries.api(),
            queries,
            notifier,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn is_in_flight(&self, id: LoanId) -> bool {
        lock_set(&self.in_flight).contains(&id)
    }

    fn begin(&self, id: LoanId) -> Option<InFlight> {
        if !lock_set(&self.in_flight).insert(id) {
            return None;
        }
        Some(InFlight {
            set: self.in_flight.clone(),
            id,
        })
    }

    /// Funds a request or takes an offer.
    ///
    /// The marketplace is refetched only after the server confirmed the
    /// accept. Failures leave every cached list untouched.
    pub async fn accept_loan(&self, loan: &Loan, cancel: &CancellationToken) -> AcceptOutcome {
        let _in_flight = match self.begin(loan.id) {
            Some(guard) => guard,
            None => {
                debug!("Accept for loan {} already in flight, ignoring", loan.id);
                return AcceptOutcome::Duplicate;
            }
        };

        if cancel.is_cancelled() {
            return AcceptOutcome::Cancelled;
        }

        info!("Accepting {} {}", loan.loan_type, loan.id);
        match cancel.run_until_cancelled(self.api.accept_loan(loan.id)).await {
            Ok(_) => {
                self.queries.refetch(QueryKey::MarketplaceLoans).await;
                if cancel.is_cancelled() {
                    return AcceptOutcome::Cancelled;
                }
                self.notifier
                    .notify(Toast::new("Success!", accept_success_message(loan.loan_type)))
                    .await;
                AcceptOutcome::Accepted
            }
            Err(Error::Cancelled) => {
                debug!("Accept for loan {} cancelled", loan.id);
                AcceptOutcome::Cancelled
            }
            Err(e) => {
                warn!("Accept for loan {} failed: {}", loan.id, e);
                let mut message = e.user_message();
                if message.trim().is_empty() {
                    message = FALLBACK_ERROR_MESSAGE.to_string();
                }
                self.notifier
                    .notify(Toast::destructive("Error", message.clone()))
                    .await;
                AcceptOutcome::Failed(message)
            }
        }
    }

    /// Success callback of the request/offer authoring form.
    pub async fn loan_created(&self, loan_type: LoanType) {
        info!("New {} posted, refreshing marketplace", loan_type);
        self.queries.refetch(QueryKey::MarketplaceLoans).await;
        self.notifier.notify(created_toast(loan_type)).await;
    }
}
