//! Remote AQI prediction

use anyhow::Result;
use aqi_lib::{validate_value, Pollutant, PollutantReading};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{color_category, format_score, print_table, OutputFormat};

/// Pollutant concentrations; omitted flags default to 0.0
#[derive(Debug, Args)]
pub struct PredictArgs {
    /// PM2.5 (µg/m³)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = concentration(Pollutant::Pm25))]
    pub pm25: f64,

    /// PM10 (µg/m³)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = concentration(Pollutant::Pm10))]
    pub pm10: f64,

    /// NO2 (µg/m³)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = concentration(Pollutant::No2))]
    pub no2: f64,

    /// SO2 (µg/m³)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = concentration(Pollutant::So2))]
    pub so2: f64,

    /// CO (mg/m³)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = concentration(Pollutant::Co))]
    pub co: f64,

    /// O3 (µg/m³)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = concentration(Pollutant::O3))]
    pub o3: f64,
}

impl PredictArgs {
    pub fn reading(&self) -> PollutantReading {
        PollutantReading::new(self.pm25, self.pm10, self.no2, self.so2, self.co, self.o3)
    }
}

/// Value parser enforcing the same field rules as the server
fn concentration(pollutant: Pollutant) -> impl Fn(&str) -> Result<f64, String> + Clone {
    move |raw: &str| {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("{} is not a number: {:?}", pollutant, raw))?;
        validate_value(pollutant, value).map_err(|e| e.to_string())?;
        Ok(value)
    }
}

#[derive(Tabled, Serialize)]
struct InputRow {
    #[tabled(rename = "Pollutant")]
    pollutant: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Send the reading to the server and show the predicted AQI
pub async fn predict(client: &ApiClient, args: &PredictArgs, format: OutputFormat) -> Result<()> {
    let reading = args.reading();
    let result = client.predict(&reading).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let rows: Vec<InputRow> = Pollutant::ALL
                .iter()
                .map(|p| InputRow {
                    pollutant: p.label(),
                    value: result.reading.get(*p).to_string(),
                })
                .collect();
            print_table(&rows, format);
            println!();

            println!(
                "{} {}",
                "Predicted AQI:".bold(),
                format_score(result.aqi).bold()
            );
            let category = format!("{} ({})", result.category_label, result.color);
            println!("Category: {}", color_category(result.category, &category));
        }
    }

    Ok(())
}
