//! Human-readable renderings of byte sizes, money and timestamps.

use chrono::{DateTime, Local, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{total_amount, CostLineItem};

const BYTE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Binary-scaled size with at most two decimals and no trailing zeros,
/// e.g. `1536 -> "1.5 KB"`, `1024 -> "1 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }

    let mut unit = 0;
    let mut divisor = 1u128;
    while unit + 1 < BYTE_UNITS.len() && u128::from(bytes) >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let scaled = bytes as f64 / divisor as f64;
    format!("{} {}", trim_decimals(&format!("{scaled:.2}")), BYTE_UNITS[unit])
}

fn trim_decimals(rendered: &str) -> &str {
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered
    }
}

/// Exactly two decimal places, halves rounded away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Sum of the items' amounts followed by the currency unit, e.g. `"15.75 USD"`.
pub fn format_currency_total(items: &[CostLineItem], unit: &str) -> String {
    format!("{} {}", format_amount(total_amount(items)), unit)
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_retention(days: Option<i64>) -> String {
    match days {
        Some(d) if d > 0 => d.to_string(),
        _ => "Never expires".into(),
    }
}
