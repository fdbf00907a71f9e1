//! Label formatting shared by the chart templates.

/// Formats a monetary amount in millions, e.g. `$1.2M`.
pub fn millions(amount: f64) -> String {
    format!("${:.1}M", amount / 1e6)
}

/// Formats a percentage with one decimal, e.g. `30.0%`.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Formats a count as a plain integer.
pub fn count(value: i64) -> String {
    value.to_string()
}

/// Title with a smaller second line, in the markup the renderer understands.
pub fn titled(title: &str, subtitle: Option<&str>) -> String {
    match subtitle {
        Some(sub) => format!("{title}<br><sub>{sub}</sub>"),
        None => title.to_string(),
    }
}
