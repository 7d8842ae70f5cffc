use super::Render;
use crate::models::Transaction;
use crate::views::format::{format_date, format_signed_btc};
use crate::views::style::transaction_kind_label;

pub struct TransactionItem<'a> {
    pub transaction: &'a Transaction,
}

impl<'a> TransactionItem<'a> {
    pub fn new(transaction: &'a Transaction) -> Self {
        Self { transaction }
    }
}

impl Render for TransactionItem<'_> {
    fn render(&self) -> String {
        let tx = self.transaction;
        let mut label = transaction_kind_label(&tx.kind);
        if let Some(loan_id) = tx.loan_id {
            label.push_str(&format!(" (loan #{})", loan_id));
        }
        let mut line = format!(
            "{}  {:<28} {:>18}",
            format_date(&tx.timestamp),
            label,
            format_signed_btc(tx.amount, tx.kind.is_outgoing())
        );
        if let Some(description) = tx.description.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(&format!("\n            {}", description));
        }
        line
    }
}
