//! Output formatting utilities

use aqi_lib::AqiCategory;
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No items found".yellow());
                return;
            }
            let table = Table::new(items).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize output: {}", e)),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Scores are always shown with exactly two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Human-readable band bounds, e.g. "50 < AQI ≤ 100"
pub fn format_range(range: (Option<f64>, Option<f64>)) -> String {
    match range {
        (None, Some(upper)) => format!("AQI ≤ {}", upper),
        (Some(lower), Some(upper)) => format!("{} < AQI ≤ {}", lower, upper),
        (Some(lower), None) => format!("AQI > {}", lower),
        (None, None) => "any".to_string(),
    }
}

/// Paint text in the category's display colour
pub fn color_category(category: AqiCategory, text: &str) -> ColoredString {
    match category {
        AqiCategory::Good => text.green(),
        AqiCategory::Moderate => text.yellow(),
        AqiCategory::UnhealthyForSensitiveGroups => text.truecolor(255, 126, 0),
        AqiCategory::Unhealthy => text.red(),
        AqiCategory::VeryUnhealthy => text.purple(),
        AqiCategory::Hazardous => text.truecolor(126, 0, 35),
    }
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "ready" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" | "not ready" => status.red().to_string(),
        _ => status.to_string(),
    }
}
