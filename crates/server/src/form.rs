//! HTML form submission for the six pollutant fields
//!
//! The raw text of each field is kept so the page can be re-rendered exactly
//! as the user left it, whatever the outcome.

use aqi_lib::{InputError, Pollutant, PollutantReading};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionForm {
    #[serde(default)]
    pub pm25: String,
    #[serde(default)]
    pub pm10: String,
    #[serde(default)]
    pub no2: String,
    #[serde(default)]
    pub so2: String,
    #[serde(default)]
    pub co: String,
    #[serde(default)]
    pub o3: String,
}

impl PredictionForm {
    /// Form pre-filled from a reading, e.g. the all-zero default
    pub fn from_reading(reading: &PollutantReading) -> Self {
        let mut form = Self::default();
        for pollutant in Pollutant::ALL {
            *form.field_mut(pollutant) = format_value(reading.get(pollutant));
        }
        form
    }

    /// Raw text as submitted
    pub fn raw(&self, pollutant: Pollutant) -> &str {
        match pollutant {
            Pollutant::Pm25 => &self.pm25,
            Pollutant::Pm10 => &self.pm10,
            Pollutant::No2 => &self.no2,
            Pollutant::So2 => &self.so2,
            Pollutant::Co => &self.co,
            Pollutant::O3 => &self.o3,
        }
    }

    fn field_mut(&mut self, pollutant: Pollutant) -> &mut String {
        match pollutant {
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::No2 => &mut self.no2,
            Pollutant::So2 => &mut self.so2,
            Pollutant::Co => &mut self.co,
            Pollutant::O3 => &mut self.o3,
        }
    }

    /// Parse every field independently. An empty field means 0.0.
    ///
    /// Only syntax is checked here; range checks happen in
    /// [`PollutantReading::validate`].
    pub fn parse(&self) -> Result<PollutantReading, InputError> {
        let mut reading = PollutantReading::default();
        for pollutant in Pollutant::ALL {
            let raw = self.raw(pollutant).trim();
            if raw.is_empty() {
                continue;
            }
            let value = raw.parse::<f64>().map_err(|_| InputError::Unparseable {
                field: pollutant,
                raw: raw.to_string(),
            })?;
            reading.set(pollutant, value);
        }
        Ok(reading)
    }
}

fn format_value(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(values: [&str; 6]) -> PredictionForm {
        let [pm25, pm10, no2, so2, co, o3] = values.map(String::from);
        PredictionForm {
            pm25,
            pm10,
            no2,
            so2,
            co,
            o3,
        }
    }

    #[test]
    fn test_parse_all_fields() {
        let reading = form(["35", "60", "20", "5", "0.8", "30"]).parse().unwrap();
        assert_eq!(reading, PollutantReading::new(35.0, 60.0, 20.0, 5.0, 0.8, 30.0));
    }

    #[test]
    fn test_empty_fields_default_to_zero() {
        let reading = form(["", " ", "20", "", "", ""]).parse().unwrap();
        assert_eq!(reading, PollutantReading::new(0.0, 0.0, 20.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_unparseable_field_is_reported() {
        let err = form(["35", "60", "lots", "5", "0.8", "30"]).parse().unwrap_err();
        assert_eq!(
            err,
            InputError::Unparseable {
                field: Pollutant::No2,
                raw: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_negative_parses_but_fails_validation() {
        let reading = form(["-1", "0", "0", "0", "0", "0"]).parse().unwrap();
        assert!(reading.validate().is_err());
    }

    #[test]
    fn test_from_reading_formats_defaults() {
        let form = PredictionForm::from_reading(&PollutantReading::default());
        for pollutant in Pollutant::ALL {
            assert_eq!(form.raw(pollutant), "0.0");
        }
    }
}
