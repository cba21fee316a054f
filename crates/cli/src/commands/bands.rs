//! Local classification commands; no server needed

use anyhow::Result;
use aqi_lib::{classify, AqiCategory};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{color_category, format_range, format_score, print_table, OutputFormat};

#[derive(Tabled, Serialize)]
struct BandRow {
    #[tabled(rename = "Category")]
    label: &'static str,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Color")]
    color: &'static str,
    #[tabled(skip)]
    key: &'static str,
}

#[derive(Serialize)]
struct Classification {
    score: f64,
    category: AqiCategory,
    label: &'static str,
    color: &'static str,
}

/// Classify a score into its AQI band
pub fn classify_score(score: f64, format: OutputFormat) -> Result<()> {
    let category = classify(score);

    match format {
        OutputFormat::Json => {
            let result = Classification {
                score,
                category,
                label: category.label(),
                color: category.color(),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Table => {
            println!("AQI: {}", format_score(score));
            println!(
                "Category: {}",
                color_category(category, &category.to_string())
            );
        }
    }

    Ok(())
}

/// List the six bands with their bounds
pub fn show_bands(format: OutputFormat) -> Result<()> {
    let rows: Vec<BandRow> = AqiCategory::ALL
        .iter()
        .map(|category| BandRow {
            label: category.label(),
            range: format_range(category.range()),
            color: category.color(),
            key: category.key(),
        })
        .collect();

    print_table(&rows, format);
    Ok(())
}
