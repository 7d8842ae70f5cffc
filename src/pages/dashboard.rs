use log::info;
use std::sync::Arc;

use super::Section;
use crate::components::{LoanTable, MarketplaceLoanCard, MetricCard, Render, TransactionItem};
use crate::config::DashboardConfig;
use crate::models::{Loan, Transaction, UserStats};
use crate::notifications::{Notifier, Toast};
use crate::query::{QueryClient, QueryKey, QueryState};
use crate::router::{Navigator, Route};
use crate::views::format::format_btc;
use crate::views::{highlighted_marketplace_loans, recent_transactions, take_prefix};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// `None` while the stats query has nothing to show yet.
    pub stats: Option<UserStats>,
    pub active_loans: Section<Vec<Loan>>,
    pub recent_transactions: Section<Vec<Transaction>>,
    pub highlighted_loans: Section<Vec<Loan>>,
    pub default_rating: f64,
}

impl DashboardView {
    pub fn compose(
        stats: &QueryState,
        active_loans: &QueryState,
        transactions: &QueryState,
        marketplace: &QueryState,
        config: &DashboardConfig,
    ) -> Self {
        // Errors fall back to zeroed stats and empty lists.
        let stats = if stats.is_initial_loading() {
            None
        } else {
            Some(stats.stats().cloned().unwrap_or_default())
        };

        Self {
            stats,
            active_loans: Section::from_state(active_loans, |s| s.loans().map(<[Loan]>::to_vec)),
            recent_transactions: Section::from_state(transactions, |s| {
                s.transactions().map(|t| {
                    take_prefix(recent_transactions(t), config.recent_transactions_limit).to_vec()
                })
            }),
            highlighted_loans: Section::from_state(marketplace, |s| {
                s.loans().map(|l| {
                    take_prefix(highlighted_marketplace_loans(l), config.highlighted_loans_limit).to_vec()
                })
            }),
            default_rating: config.default_rating,
        }
    }

    pub fn metric_cards(&self) -> Vec<MetricCard> {
        let stats = self.stats.as_ref();
        vec![
            MetricCard::new("Total Borrowed", stats.map(|s| format_btc(s.total_borrowed))),
            MetricCard::new("Total Lent", stats.map(|s| format_btc(s.total_lent))),
            MetricCard::new("Active Loans", stats.map(|s| s.active_loans.to_string())),
            MetricCard::new("Interest Earned", stats.map(|s| format_btc(s.interest_earned))),
        ]
    }
}

impl Render for DashboardView {
    fn render(&self) -> String {
        let mut out = vec!["Overview".to_string()];
        out.extend(self.metric_cards().iter().map(|card| format!("  {}", card.render())));

        out.push(String::new());
        out.push("Your Active Loans".to_string());
        out.push(match &self.active_loans {
            Section::Loading => "Loading active loans...".to_string(),
            Section::Empty => LoanTable::new(&[]).render(),
            Section::Ready(loans) => LoanTable::new(loans).render(),
        });

        out.push(String::new());
        out.push("Recent Transactions".to_string());
        out.push(match &self.recent_transactions {
            Section::Loading => "Loading transactions...".to_string(),
            Section::Empty => "No recent transactions".to_string(),
            Section::Ready(txs) => txs
                .iter()
                .map(|tx| TransactionItem::new(tx).render())
                .collect::<Vec<_>>()
                .join("\n"),
        });

        out.push(String::new());
        out.push("Loan Marketplace".to_string());
        out.push(match &self.highlighted_loans {
            Section::Loading => "Loading marketplace loans...".to_string(),
            Section::Empty => "No marketplace loans available".to_string(),
            Section::Ready(loans) => loans
                .iter()
                .map(|loan| MarketplaceLoanCard::new(loan).with_rating(self.default_rating).render())
                .collect::<Vec<_>>()
                .join("\n\n"),
        });

        out.join("\n")
    }
}

pub struct DashboardPage {
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
    navigator: Navigator,
    config: DashboardConfig,
}

impl DashboardPage {
    pub fn new(
        queries: QueryClient,
        notifier: Arc<dyn Notifier>,
        navigator: Navigator,
        config: DashboardConfig,
    ) -> Self {
        Self {
            queries,
            notifier,
            navigator,
            config,
        }
    }

    /// Fetches all four dashboard queries concurrently and composes the view.
    pub async fn load(&self) -> DashboardView {
        info!("Loading dashboard");
        let (stats, active, transactions, marketplace) = tokio::join!(
            self.queries.fetch(QueryKey::UserStats),
            self.queries.fetch(QueryKey::ActiveLoans),
            self.queries.fetch(QueryKey::Transactions),
            self.queries.fetch(QueryKey::MarketplaceLoans),
        );
        DashboardView::compose(&stats, &active, &transactions, &marketplace, &self.config)
    }

    /// Composes the view from whatever is cached, without any I/O.
    pub async fn view(&self) -> DashboardView {
        DashboardView::compose(
            &self.queries.get(QueryKey::UserStats).await,
            &self.queries.get(QueryKey::ActiveLoans).await,
            &self.queries.get(QueryKey::Transactions).await,
            &self.queries.get(QueryKey::MarketplaceLoans).await,
            &self.config,
        )
    }

    pub async fn view_loan_details(&self, loan: &Loan) {
        self.navigator.navigate(Route::LoanDetails(loan.id)).await;
    }

    /// Accepting from the dashboard teaser is not wired up yet; the
    /// marketplace page handles real accepts.
    pub async fn accept_loan(&self, _loan: &Loan) {
        self.notifier
            .notify(Toast::new("Coming Soon", "This feature is under development"))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockLendingApi;
    use crate::error::Error;
    use crate::models::{LoanStatus, LoanType, TransactionKind};
    use crate::notifications::Toaster;
    use crate::query::QueryData;
    use chrono::Utc;

    fn loan(id: i64) -> Loan {
        Loan {
            id,
            loan_type: if id % 2 == 0 { LoanType::Offer } else { LoanType::Request },
            amount: 0.1 * id as f64,
            interest: 5.0,
            duration_months: 6,
            status: LoanStatus::Active,
            has_collateral: true,
            created_at: None,
        }
    }

    fn tx(id: i64) -> Transaction {
        Transaction {
            id,
            loan_id: None,
            amount: 0.01,
            kind: TransactionKind::Deposit,
            description: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_compose_truncates_and_handles_states() {
        let config = DashboardConfig::default();
        let view = DashboardView::compose(
            &QueryState::Idle,
            &QueryState::Success(QueryData::Loans(vec![])),
            &QueryState::Success(QueryData::Transactions((1..=5).map(tx).collect())),
            &QueryState::Success(QueryData::Loans((1..=6).map(loan).collect())),
            &config,
        );

        assert!(view.stats.is_none());
        assert_eq!(view.metric_cards()[0].value_text(), "Loading...");
        assert_eq!(view.active_loans, Section::Empty);
        match &view.recent_transactions {
            Section::Ready(txs) => assert_eq!(txs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]),
            other => panic!("unexpected {:?}", other),
        }
        match &view.highlighted_loans {
            Section::Ready(loans) => assert_eq!(loans.len(), 4),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_configured_limits_only_shrink_lists() {
        let roomy = DashboardConfig {
            recent_transactions_limit: 10,
            highlighted_loans_limit: 10,
            ..DashboardConfig::default()
        };
        let view = DashboardView::compose(
            &QueryState::Idle,
            &QueryState::Idle,
            &QueryState::Success(QueryData::Transactions((1..=5).map(tx).collect())),
            &QueryState::Success(QueryData::Loans((1..=6).map(loan).collect())),
            &roomy,
        );
        assert!(matches!(&view.recent_transactions, Section::Ready(t) if t.len() == 3));
        assert!(matches!(&view.highlighted_loans, Section::Ready(l) if l.len() == 4));

        let tight = DashboardConfig {
            recent_transactions_limit: 1,
            ..DashboardConfig::default()
        };
        let view = DashboardView::compose(
            &QueryState::Idle,
            &QueryState::Idle,
            &QueryState::Success(QueryData::Transactions((1..=5).map(tx).collect())),
            &QueryState::Idle,
            &tight,
        );
        assert!(matches!(&view.recent_transactions, Section::Ready(t) if t.len() == 1));
    }

    #[test]
    fn test_failed_stats_fall_back_to_zero() {
        let config = DashboardConfig::default();
        let view = DashboardView::compose(
            &QueryState::Error("500: down".to_string()),
            &QueryState::Error("500: down".to_string()),
            &QueryState::Loading { previous: None },
            &QueryState::Success(QueryData::Loans(vec![])),
            &config,
        );
        assert_eq!(view.metric_cards()[1].value_text(), "0.00 BTC");
        let text = view.render();
        assert!(text.contains("No active loans"));
        assert!(text.contains("Loading transactions..."));
        assert!(text.contains("No marketplace loans available"));
    }

    #[tokio::test]
    async fn test_load_fetches_every_query() {
        let mut api = MockLendingApi::new();
        api.expect_get_user_stats().times(1).returning(|| {
            Ok(UserStats {
                total_borrowed: 1.5,
                total_lent: 0.0,
                active_loans: 2,
                interest_earned: 0.03,
            })
        });
        api.expect_get_active_loans().times(1).returning(|| Ok(vec![loan(1)]));
        api.expect_get_transactions()
            .times(1)
            .returning(|| Err(Error::ApiError("502: bad gateway".to_string())));
        api.expect_get_marketplace_loans().times(1).returning(|| Ok(vec![loan(2)]));

        let toaster = Toaster::new(5);
        let navigator = Navigator::new(Route::Dashboard);
        let page = DashboardPage::new(
            QueryClient::new(Arc::new(api), None),
            Arc::new(toaster.clone()),
            navigator.clone(),
            DashboardConfig::default(),
        );

        let view = page.load().await;
        assert_eq!(view.metric_cards()[0].value_text(), "1.50 BTC");
        assert_eq!(view.metric_cards()[2].value_text(), "2");
        assert_eq!(view.recent_transactions, Section::Empty);
        assert_eq!(page.view().await, view);

        page.view_loan_details(&loan(7)).await;
        assert_eq!(navigator.location().await, Route::LoanDetails(7));

        page.accept_loan(&loan(2)).await;
        assert_eq!(toaster.active().await[0].title, "Coming Soon");
    }
}
