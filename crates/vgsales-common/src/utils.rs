//! Shared formatting helpers.

/// Unit suffix appended to sales values (millions of units).
pub const MILLIONS_SUFFIX: &str = "M";

/// Formats a sales value in millions, e.g. `41.49M`.
#[must_use]
pub fn format_millions(value: f64) -> String {
    format!("{value:.2}{MILLIONS_SUFFIX}")
}

/// Formats a percentage with one decimal, e.g. `12.5%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Truncates a string to a maximum number of characters with ellipsis.
#[must_use]
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
