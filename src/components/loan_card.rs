use super::Render;
use crate::models::{Loan, LoanStatus};
use crate::views::format::{capitalize, format_btc, format_date, format_duration, format_percent, format_yes_no};
use crate::views::style::{loan_type_class, status_badge_or_report};

pub struct LoanCard<'a> {
    pub loan: &'a Loan,
    pub show_repay_button: bool,
}

impl<'a> LoanCard<'a> {
    pub fn new(loan: &'a Loan) -> Self {
        Self {
            loan,
            show_repay_button: false,
        }
    }

    pub fn with_repay_button(mut self, show: bool) -> Self {
        self.show_repay_button = show;
        self
    }

    /// From the user's side: requests are money borrowed, offers money lent.
    pub fn type_label(&self) -> &'static str {
        if self.loan.is_request() {
            "Borrowed"
        } else {
            "Lent"
        }
    }

    pub fn can_repay(&self) -> bool {
        self.show_repay_button && self.loan.status == LoanStatus::Active && self.loan.is_request()
    }

    pub fn view_details<F: FnOnce(&Loan)>(&self, on_view_details: F) {
        on_view_details(self.loan);
    }

    /// No-op unless the repay action is shown.
    pub fn repay<F: FnOnce(&Loan)>(&self, on_repay: F) {
        if self.can_repay() {
            on_repay(self.loan);
        }
    }
}

impl Render for LoanCard<'_> {
    fn render(&self) -> String {
        let loan = self.loan;
        let mut lines = vec![
            format!(
                "[{}] {}  ({})",
                self.type_label(),
                format_btc(loan.amount),
                loan_type_class(loan.loan_type)
            ),
            format!("  Interest Rate: {}", format_percent(loan.interest)),
            format!("  Duration: {}", format_duration(loan.duration_months)),
            format!(
                "  Status: {} ({})",
                capitalize(loan.status.as_str()),
                status_badge_or_report(&loan.status)
            ),
            format!("  Collateral: {}", format_yes_no(loan.has_collateral)),
        ];
        if let Some(created_at) = &loan.created_at {
            lines.push(format!("  Created on {}", format_date(created_at)));
        }
        if self.can_repay() {
            lines.push("  > Make Repayment".to_string());
        }
        lines.join("\n")
    }
}

pub struct LoanTable<'a> {
    pub loans: &'a [Loan],
}

impl<'a> LoanTable<'a> {
    pub fn new(loans: &'a [Loan]) -> Self {
        Self { loans }
    }

    pub fn row(loan: &Loan) -> String {
        format!(
            "#{:<6} {:<8} {:>16} {:>8} {:>10} {:<10}",
            loan.id,
            if loan.is_request() { "Borrowed" } else { "Lent" },
            format_btc(loan.amount),
            format_percent(loan.interest),
            format_duration(loan.duration_months),
            capitalize(loan.status.as_str())
        )
    }
}

impl Render for LoanTable<'_> {
    fn render(&self) -> String {
        if self.loans.is_empty() {
            return "No active loans".to_string();
        }
        let header = format!(
            "{:<7} {:<8} {:>16} {:>8} {:>10} {:<10}",
            "ID", "Type", "Amount", "Rate", "Duration", "Status"
        );
        std::iter::once(header)
            .chain(self.loans.iter().map(Self::row))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
