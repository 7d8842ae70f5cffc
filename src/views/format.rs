use chrono::{DateTime, Utc};

const BTC_DECIMALS: usize = 8;
const BTC_MIN_DECIMALS: usize = 2;

/// Eight decimal places, trailing zeros trimmed down to two.
pub fn format_btc(amount: f64) -> String {
    format!("{} BTC", trim_decimals(amount))
}

/// Like `format_btc` but always carries a sign, for transaction lists.
pub fn format_signed_btc(amount: f64, outgoing: bool) -> String {
    let sign = if outgoing { '-' } else { '+' };
    format!("{}{} BTC", sign, trim_decimals(amount.abs()))
}

fn trim_decimals(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{:.*}", BTC_MIN_DECIMALS, 0.0);
    }
    let mut text = format!("{:.*}", BTC_DECIMALS, amount);
    if let Some(dot) = text.find('.') {
        while text.ends_with('0') && text.len() - dot - 1 > BTC_MIN_DECIMALS {
            text.pop();
        }
    }
    text
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", value)
}

pub fn format_duration(months: u32) -> String {
    if months == 1 {
        "1 month".to_string()
    } else {
        format!("{} months", months)
    }
}

pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

pub fn format_yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
