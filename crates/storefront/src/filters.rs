//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Shortens an ID to the first 8 characters, for order references.
///
/// Usage in templates: `#{{ order.id|short_id }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn short_id(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.to_string().chars().take(8).collect())
}

/// First word of a full name, for the compact header greeting.
///
/// Usage in templates: `Hi, {{ user.name|first_name }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn first_name(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let full = value.to_string();
    Ok(full
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string())
}

/// Formats a backend ISO 8601 timestamp as a human-readable date.
///
/// Usage in templates: `{{ order.created_at|order_date }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn order_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_order_date(&value.to_string()))
}

/// Parse a backend timestamp, with or without a timezone offset, and render
/// just the date. Unparseable input is shown as-is.
fn format_order_date(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %d, %Y").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%b %d, %Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::format_order_date;

    #[test]
    fn test_format_order_date_naive() {
        assert_eq!(format_order_date("2024-01-15T10:30:00"), "Jan 15, 2024");
        assert_eq!(
            format_order_date("2024-01-15T10:30:00.123456"),
            "Jan 15, 2024"
        );
    }

    #[test]
    fn test_format_order_date_with_offset() {
        assert_eq!(
            format_order_date("2024-01-15T10:30:00-03:00"),
            "Jan 15, 2024"
        );
    }

    #[test]
    fn test_format_order_date_unparseable_passes_through() {
        assert_eq!(format_order_date("yesterday"), "yesterday");
    }
}
