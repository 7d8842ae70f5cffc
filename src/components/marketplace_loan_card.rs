use super::Render;
use crate::models::Loan;
use crate::views::format::{format_btc, format_duration, format_percent, format_yes_no};
use crate::views::style::loan_type_class;

pub const DEFAULT_RATING: f64 = 4.5;

pub struct MarketplaceLoanCard<'a> {
    pub loan: &'a Loan,
    pub rating: f64,
}

impl<'a> MarketplaceLoanCard<'a> {
    pub fn new(loan: &'a Loan) -> Self {
        Self {
            loan,
            rating: DEFAULT_RATING,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn listing_label(&self) -> &'static str {
        if self.loan.is_request() {
            "Loan Request"
        } else {
            "Loan Offer"
        }
    }

    /// Whose rating is shown: the borrower for requests, the lender for offers.
    pub fn counterparty(&self) -> &'static str {
        if self.loan.is_request() {
            "Borrower"
        } else {
            "Lender"
        }
    }

    pub fn action_label(&self) -> &'static str {
        if self.loan.is_request() {
            "Lend Now"
        } else {
            "Borrow Now"
        }
    }

    pub fn accept<F: FnOnce(&Loan)>(&self, on_accept: F) {
        on_accept(self.loan);
    }
}

impl Render for MarketplaceLoanCard<'_> {
    fn render(&self) -> String {
        let loan = self.loan;
        [
            format!(
                "#{} [{}] {}  ({})",
                loan.id,
                self.listing_label(),
                format_btc(loan.amount),
                loan_type_class(loan.loan_type)
            ),
            format!("  Interest Rate: {}", format_percent(loan.interest)),
            format!("  Duration: {}", format_duration(loan.duration_months)),
            format!("  {} Rating: {}/5", self.counterparty(), self.rating),
            format!("  Collateral: {}", format_yes_no(loan.has_collateral)),
            format!("  > {}", self.action_label()),
        ]
        .join("\n")
    }
}
