//! Server-rendered prediction page

use crate::form::PredictionForm;
use aqi_lib::{Evaluation, Pollutant, PredictionOutcome};
use std::fmt::Write;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8">
<title>Air Quality Index Predictor</title>
<style>
body{font-family:sans-serif;max-width:40em;margin:2em auto;padding:0 1em}
label{display:block;margin-top:.8em}
input{width:100%;padding:.3em}
button{margin-top:1.2em;padding:.5em 1.5em}
.result{margin-top:1.5em;padding:1em;border-left:.5em solid #888}
.error{margin-top:1.5em;padding:1em;border-left:.5em solid #b00;background:#fee}
</style></head>
<body>
<h1>Air Quality Index Predictor</h1>
<p>Enter pollutant concentrations to predict the AQI.</p>
"#;

const PAGE_TAIL: &str = "</body></html>\n";

/// CSS colour for each category's display colour name
fn css_color(color: &str) -> &'static str {
    match color {
        "Green" => "#00e400",
        "Yellow" => "#ffff00",
        "Orange" => "#ff7e00",
        "Red" => "#ff0000",
        "Purple" => "#8f3f97",
        _ => "#7e0023",
    }
}

/// Render the form, plus the result or error block of an evaluation
pub fn page(form: &PredictionForm, evaluation: Option<&Evaluation>) -> String {
    let mut html = String::from(PAGE_HEAD);
    write_form(&mut html, form);

    match evaluation {
        Some(Evaluation::Success(outcome)) => write_result(&mut html, outcome),
        Some(failed) => {
            if let Some(message) = failed.error_message() {
                write_error(&mut html, &message);
            }
        }
        None => {}
    }

    html.push_str(PAGE_TAIL);
    html
}

/// Page shown when the form itself could not be understood
pub fn error_page(form: &PredictionForm, message: &str) -> String {
    let mut html = String::from(PAGE_HEAD);
    write_form(&mut html, form);
    write_error(&mut html, message);
    html.push_str(PAGE_TAIL);
    html
}

fn write_form(html: &mut String, form: &PredictionForm) {
    html.push_str("<form method=\"post\" action=\"/predict\">\n");
    for pollutant in Pollutant::ALL {
        let _ = writeln!(
            html,
            "<label for=\"{key}\">{label}</label>\n\
             <input type=\"number\" id=\"{key}\" name=\"{key}\" min=\"0\" step=\"{step}\" value=\"{value}\">",
            key = pollutant.key(),
            label = escape(&pollutant.label()),
            step = pollutant.step(),
            value = escape(form.raw(pollutant)),
        );
    }
    html.push_str("<button type=\"submit\">Predict AQI</button>\n</form>\n");
}

fn write_result(html: &mut String, outcome: &PredictionOutcome) {
    let _ = writeln!(
        html,
        "<div class=\"result\" style=\"border-left-color:{}\">\n<h2>{}</h2>\n<p>{}</p>\n</div>",
        css_color(outcome.color),
        escape(&outcome.headline()),
        escape(&outcome.category_line()),
    );
}

fn write_error(html: &mut String, message: &str) {
    let _ = writeln!(html, "<div class=\"error\">{}</div>", escape(message));
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi_lib::{AqiScore, InputError, PollutantReading};

    #[test]
    fn test_blank_page_has_all_inputs() {
        let html = page(&PredictionForm::from_reading(&PollutantReading::default()), None);

        for pollutant in Pollutant::ALL {
            assert!(html.contains(&format!("name=\"{}\"", pollutant.key())));
        }
        assert!(html.contains("PM2.5 (µg/m³)"));
        assert!(html.contains("CO (mg/m³)"));
        assert!(html.contains("step=\"0.01\""));
        assert!(html.contains("Predict AQI"));
        assert!(!html.contains("class=\"result\""));
    }

    #[test]
    fn test_result_block() {
        let reading = PollutantReading::new(35.0, 60.0, 20.0, 5.0, 0.8, 30.0);
        let outcome = PredictionOutcome::new(reading, AqiScore::from_raw(46.416));
        let html = page(
            &PredictionForm::from_reading(&reading),
            Some(&Evaluation::Success(outcome)),
        );

        assert!(html.contains("Predicted AQI: 46.42"));
        assert!(html.contains("Category: Good (Green)"));
        assert!(html.contains("value=\"35.0\""));
    }

    #[test]
    fn test_error_block_escapes_user_text() {
        let form = PredictionForm {
            pm25: "<script>".to_string(),
            ..Default::default()
        };
        let error = InputError::Unparseable {
            field: Pollutant::Pm25,
            raw: "<script>".to_string(),
        };
        let html = page(&form, Some(&Evaluation::InvalidInput(error)));

        assert!(html.contains("class=\"error\""));
        assert!(!html.contains("<script>"));
        assert!(html.contains("value=\"&lt;script&gt;\""));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a & \"b\" <c>"), "a &amp; &quot;b&quot; &lt;c&gt;");
    }
}
