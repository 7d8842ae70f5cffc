//! Page controllers: each owns its queries, local UI state and renders a view.

pub mod dashboard;
pub mod login;
pub mod marketplace;

pub use dashboard::{DashboardPage, DashboardView};
pub use login::{FieldError, LoginForm, LoginOutcome, LoginPage};
pub use marketplace::{MarketplacePage, MarketplaceTab, MarketplaceView};

use crate::components::{Header, Render};
use crate::query::QueryState;
use crate::router::Route;

/// A list section of a page: still loading, nothing to show, or rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Loading,
    Empty,
    Ready(T),
}

impl<U> Section<Vec<U>> {
    pub fn from_state<F>(state: &QueryState, extract: F) -> Self
    where
        F: FnOnce(&QueryState) -> Option<Vec<U>>,
    {
        if state.is_initial_loading() {
            return Section::Loading;
        }
        match extract(state) {
            Some(rows) if !rows.is_empty() => Section::Ready(rows),
            _ => Section::Empty,
        }
    }
}

/// A full screen: the header for `route` above the page body.
pub fn render_screen(route: &Route, unread_notifications: usize, body: &str) -> String {
    let mut header = Header::new(route.clone());
    header.unread_notifications = unread_notifications;
    format!("{}\n\n{}", header.render(), body)
}
