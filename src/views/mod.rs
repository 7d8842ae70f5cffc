//! Pure transformations from API records to display-ready subsets.

use crate::models::{Loan, LoanType, Transaction};

pub mod format;
pub mod style;

pub const RECENT_TRANSACTIONS_LIMIT: usize = 3;
pub const HIGHLIGHTED_LOANS_LIMIT: usize = 4;

/// Order-preserving prefix of at most `limit` items.
pub fn take_prefix<T>(items: &[T], limit: usize) -> &[T] {
    &items[..items.len().min(limit)]
}

/// First three transactions, in the order the server sent them.
pub fn recent_transactions(transactions: &[Transaction]) -> &[Transaction] {
    take_prefix(transactions, RECENT_TRANSACTIONS_LIMIT)
}

/// First four marketplace listings for the dashboard teaser.
pub fn highlighted_marketplace_loans(loans: &[Loan]) -> &[Loan] {
    take_prefix(loans, HIGHLIGHTED_LOANS_LIMIT)
}

/// Marketplace listings split by who created them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketplaceTabs<'a> {
    pub requests: Vec<&'a Loan>,
    pub offers: Vec<&'a Loan>,
}

impl<'a> MarketplaceTabs<'a> {
    pub fn len(&self) -> usize {
        self.requests.len() + self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tab(&self, loan_type: LoanType) -> &[&'a Loan] {
        match loan_type {
            LoanType::Request => &self.requests,
            LoanType::Offer => &self.offers,
        }
    }
}

/// Every loan lands in exactly one tab; relative order is kept within each.
pub fn partition_by_type(loans: &[Loan]) -> MarketplaceTabs<'_> {
    let (requests, offers): (Vec<&Loan>, Vec<&Loan>) = loans
        .iter()
        .partition(|loan| loan.loan_type == LoanType::Request);
    MarketplaceTabs { requests, offers }
}
