use log::debug;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::LoanId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Loans,
    LoanDetails(LoanId),
    Marketplace,
    MarketplaceRequest,
    MarketplaceOffer,
    Transactions,
    Wallet,
    Settings,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/loans" => Route::Loans,
            "/marketplace" => Route::Marketplace,
            "/marketplace/request" => Route::MarketplaceRequest,
            "/marketplace/offer" => Route::MarketplaceOffer,
            "/transactions" => Route::Transactions,
            "/wallet" => Route::Wallet,
            "/settings" => Route::Settings,
            other => other
                .strip_prefix("/loans/")
                .and_then(|id| id.parse::<LoanId>().ok())
                .map(Route::LoanDetails)
                .unwrap_or_else(|| Route::NotFound(path.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Loans => "/loans".to_string(),
            Route::LoanDetails(id) => format!("/loans/{}", id),
            Route::Marketplace => "/marketplace".to_string(),
            Route::MarketplaceRequest => "/marketplace/request".to_string(),
            Route::MarketplaceOffer => "/marketplace/offer".to_string(),
            Route::Transactions => "/transactions".to_string(),
            Route::Wallet => "/wallet".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Header title. Only top-level pages have their own; everything else
    /// shows the product name.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Loans => "My Loans",
            Route::Marketplace => "Loan Marketplace",
            Route::Transactions => "Transactions",
            Route::Wallet => "Wallet",
            Route::Settings => "Settings",
            _ => "BitLend",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Current location, shared between pages.
#[derive(Debug, Clone)]
pub struct Navigator {
    location: Arc<RwLock<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            location: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn navigate(&self, route: Route) {
        debug!("Navigating to {}", route);
        *self.location.write().await = route;
    }

    pub async fn location(&self) -> Route {
        self.location.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_path() {
        assert_eq!(Route::parse("/loans/17"), Route::LoanDetails(17));
        assert_eq!(Route::LoanDetails(17).path(), "/loans/17");
        assert_eq!(Route::parse("/marketplace/"), Route::Marketplace);
        assert_eq!(Route::parse("/"), Route::Login);
        assert_eq!(Route::parse("/loans/abc"), Route::NotFound("/loans/abc".to_string()));
    }

    #[test]
    fn test_titles() {
        assert_eq!(Route::Dashboard.title(), "Dashboard");
        assert_eq!(Route::Loans.title(), "My Loans");
        assert_eq!(Route::Marketplace.title(), "Loan Marketplace");
        assert_eq!(Route::LoanDetails(3).title(), "BitLend");
        assert_eq!(Route::parse("/nope").title(), "BitLend");
    }

    #[tokio::test]
    async fn test_navigator() {
        let nav = Navigator::new(Route::Login);
        nav.navigate(Route::Dashboard).await;
        assert_eq!(nav.location().await, Route::Dashboard);
    }
}
