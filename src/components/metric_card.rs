use super::Render;

pub const LOADING_TEXT: &str = "Loading...";

pub struct MetricCard {
    pub title: &'static str,
    pub value: Option<String>,
}

impl MetricCard {
    pub fn new(title: &'static str, value: Option<String>) -> Self {
        Self { title, value }
    }

    pub fn value_text(&self) -> &str {
        self.value.as_deref().unwrap_or(LOADING_TEXT)
    }
}

impl Render for MetricCard {
    fn render(&self) -> String {
        format!("{:<16} {}", self.title, self.value_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_placeholder() {
        assert_eq!(MetricCard::new("Total Lent", None).value_text(), "Loading...");
        let card = MetricCard::new("Active Loans", Some("2".to_string()));
        assert_eq!(card.render(), "Active Loans     2");
    }
}
