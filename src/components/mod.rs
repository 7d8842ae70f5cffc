//! Stateless text renderers for loans, transactions and page chrome.

pub mod header;
pub mod loan_card;
pub mod marketplace_loan_card;
pub mod metric_card;
pub mod transaction_item;

pub use header::Header;
pub use loan_card::{LoanCard, LoanTable};
pub use marketplace_loan_card::MarketplaceLoanCard;
pub use metric_card::MetricCard;
pub use transaction_item::TransactionItem;

pub trait Render {
    fn render(&self) -> String;
}
