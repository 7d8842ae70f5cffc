use super::Render;
use crate::router::Route;

/// Page header with its local UI state: search text and the mobile menu.
#[derive(Debug, Clone)]
pub struct Header {
    pub route: Route,
    pub search_query: String,
    pub menu_open: bool,
    pub unread_notifications: usize,
}

impl Header {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            search_query: String::new(),
            menu_open: false,
            unread_notifications: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        self.route.title()
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }
}

impl Render for Header {
    fn render(&self) -> String {
        let mut line = format!("== {} ==", self.title());
        if !self.search_query.is_empty() {
            line.push_str(&format!("  search: {}", self.search_query));
        }
        if self.unread_notifications > 0 {
            line.push_str(&format!("  [{} new]", self.unread_notifications));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_state() {
        let mut header = Header::new(Route::Marketplace);
        assert_eq!(header.render(), "== Loan Marketplace ==");
        assert!(header.toggle_menu());
        assert!(!header.toggle_menu());

        header.set_search("btc");
        header.unread_notifications = 2;
        assert_eq!(header.render(), "== Loan Marketplace ==  search: btc  [2 new]");
    }
}
