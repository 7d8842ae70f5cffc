use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;

use super::Section;
use crate::actions::{AcceptOutcome, LoanActionDispatcher};
use crate::components::{MarketplaceLoanCard, Render};
use crate::models::{Loan, LoanId, LoanType};
use crate::notifications::Notifier;
use crate::query::{QueryClient, QueryKey, QueryState};
use crate::utils::{CancellationToken, DropGuard};
use crate::views::partition_by_type;

const REQUEST_RATING: f64 = 4.5;
const OFFER_RATING: f64 = 4.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketplaceTab {
    #[default]
    Requests,
    Offers,
}

impl MarketplaceTab {
    pub fn loan_type(&self) -> LoanType {
        match self {
            MarketplaceTab::Requests => LoanType::Request,
            MarketplaceTab::Offers => LoanType::Offer,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MarketplaceTab::Requests => "Loan Requests",
            MarketplaceTab::Offers => "Loan Offers",
        }
    }
}

/// Which authoring form is open. At most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormState {
    pub request_open: bool,
    pub offer_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceView {
    pub active_tab: MarketplaceTab,
    pub requests: Section<Vec<Loan>>,
    pub offers: Section<Vec<Loan>>,
    pub forms: FormState,
}

impl MarketplaceView {
    pub fn compose(state: &QueryState, active_tab: MarketplaceTab, forms: FormState) -> Self {
        let split = |loan_type: LoanType| {
            Section::from_state(state, |s| {
                s.loans().map(|loans| {
                    partition_by_type(loans)
                        .tab(loan_type)
                        .iter()
                        .map(|loan| (*loan).clone())
                        .collect::<Vec<Loan>>()
                })
            })
        };
        Self {
            active_tab,
            requests: split(LoanType::Request),
            offers: split(LoanType::Offer),
            forms,
        }
    }

    pub fn section(&self, tab: MarketplaceTab) -> &Section<Vec<Loan>> {
        match tab {
            MarketplaceTab::Requests => &self.requests,
            MarketplaceTab::Offers => &self.offers,
        }
    }
}

impl Render for MarketplaceView {
    fn render(&self) -> String {
        let tab = self.active_tab;
        let mut out = vec![
            "Loan Marketplace   [+ Request Loan] [Offer Loan]".to_string(),
            format!(
                "{} | {}",
                tab_label(MarketplaceTab::Requests, tab),
                tab_label(MarketplaceTab::Offers, tab)
            ),
            String::new(),
        ];

        let (noun, cta, rating) = match tab {
            MarketplaceTab::Requests => ("loan requests", "Create a Loan Offer", REQUEST_RATING),
            MarketplaceTab::Offers => ("loan offers", "Create a Loan Request", OFFER_RATING),
        };
        match self.section(tab) {
            Section::Loading => out.push(format!("Loading {}...", noun)),
            Section::Empty => {
                out.push(format!("No {} available", noun));
                out.push(format!("[{}]", cta));
            }
            Section::Ready(loans) => out.extend(
                loans
                    .iter()
                    .map(|loan| MarketplaceLoanCard::new(loan).with_rating(rating).render()),
            ),
        }

        if self.forms.request_open {
            out.push("\n(Request form open)".to_string());
        } else if self.forms.offer_open {
            out.push("\n(Offer form open)".to_string());
        }
        out.join("\n")
    }
}

fn tab_label(tab: MarketplaceTab, active: MarketplaceTab) -> String {
    if tab == active {
        format!("[{}]", tab.title())
    } else {
        format!(" {} ", tab.title())
    }
}

/// Marketplace screen. Dropping the page cancels any accept still in flight.
pub struct MarketplacePage {
    queries: QueryClient,
    dispatcher: LoanActionDispatcher,
    active_tab: MarketplaceTab,
    forms: FormState,
    updates: Option<watch::Receiver<QueryState>>,
    lifetime: DropGuard,
}

impl MarketplacePage {
    pub fn new(queries: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        let dispatcher = LoanActionDispatcher::new(queries.clone(), notifier);
        Self::with_dispatcher(queries, dispatcher)
    }

    pub fn with_dispatcher(queries: QueryClient, dispatcher: LoanActionDispatcher) -> Self {
        Self {
            queries,
            dispatcher,
            active_tab: MarketplaceTab::default(),
            forms: FormState::default(),
            updates: None,
            lifetime: CancellationToken::new().drop_guard(),
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        self.lifetime.token()
    }

    /// Subscribes to the listing so invalidations refetch it, then fetches.
    pub async fn load(&mut self) -> MarketplaceView {
        if self.updates.is_none() {
            self.updates = Some(self.queries.subscribe(QueryKey::MarketplaceLoans).await);
        }
        let state = self.queries.fetch(QueryKey::MarketplaceLoans).await;
        MarketplaceView::compose(&state, self.active_tab, self.forms)
    }

    pub async fn view(&self) -> MarketplaceView {
        let state = self.queries.get(QueryKey::MarketplaceLoans).await;
        MarketplaceView::compose(&state, self.active_tab, self.forms)
    }

    /// Waits for the next change to the listing and returns the new view.
    pub async fn next_update(&mut self) -> Option<MarketplaceView> {
        let updates = self.updates.as_mut()?;
        updates.changed().await.ok()?;
        let state = updates.borrow_and_update().clone();
        Some(MarketplaceView::compose(&state, self.active_tab, self.forms))
    }

    pub fn active_tab(&self) -> MarketplaceTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: MarketplaceTab) {
        self.active_tab = tab;
    }

    pub fn forms(&self) -> FormState {
        self.forms
    }

    pub fn open_request_form(&mut self) {
        self.forms = FormState {
            request_open: true,
            offer_open: false,
        };
    }

    pub fn open_offer_form(&mut self) {
        self.forms = FormState {
            request_open: false,
            offer_open: true,
        };
    }

    pub fn close_forms(&mut self) {
        self.forms = FormState::default();
    }

    pub async fn accept(&self, loan: &Loan) -> AcceptOutcome {
        self.dispatcher.accept_loan(loan, self.cancellation()).await
    }

    /// Accepts by id, looking the loan up in the cached listing.
    pub async fn accept_by_id(&self, id: LoanId) -> Option<AcceptOutcome> {
        let loan = self
            .queries
            .get(QueryKey::MarketplaceLoans)
            .await
            .loans()
            .and_then(|loans| loans.iter().find(|loan| loan.id == id).cloned());
        match loan {
            Some(loan) => Some(self.accept(&loan).await),
            None => {
                debug!("Loan {} is not in the marketplace listing", id);
                None
            }
        }
    }

    /// Success callback from the authoring form.
    pub async fn loan_created(&mut self, loan_type: LoanType) {
        info!("{} form submitted", loan_type);
        self.close_forms();
        self.dispatcher.loan_created(loan_type).await;
    }
}
