//! Terminal styling helpers for report output

use console::{style, Emoji};

pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Print a section title followed by a dim rule.
pub fn print_section_header(title: &str) {
    println!();
    println!("    {}{}", CHART, style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

/// Render a statistic for display; infinite and undefined values are spelled out.
pub fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.4}", value)
    }
}
