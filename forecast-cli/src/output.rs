use std::fmt::Write;

use forecast_core::{ForecastPanel, ForecastReport, SubmitError};

use crate::cli::OutputFormat;

pub fn print_report(report: &ForecastReport, format: OutputFormat) -> anyhow::Result<()> {
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    match format {
        OutputFormat::Text => print!("{}", render_panel(&report.panel)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }

    Ok(())
}

pub fn render_panel(panel: &ForecastPanel) -> String {
    let width = panel.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    let mut out = String::new();

    let _ = writeln!(out, "{}", panel.title);
    let _ = writeln!(out, "{}", panel.subtitle);
    let _ = writeln!(out);
    for row in &panel.rows {
        let label = format!("{}:", row.label);
        let _ = writeln!(out, "  {label:<pad$}  {}", row.value, pad = width + 1);
    }
    if panel.degraded {
        let _ = writeln!(out);
        let _ = writeln!(out, "(prediction could not be decoded, default values shown)");
    }

    out
}

pub fn render_failure(err: &SubmitError) -> String {
    let mut out = format!("error: {err}\n");

    if let SubmitError::Predict { debug, .. } = err {
        let prediction = debug
            .prediction
            .as_ref()
            .map(|p| format!("{:?}", p.flatten()))
            .unwrap_or_else(|| "Not available".to_string());
        let (rows, cols) = debug.features_shape;

        let _ = writeln!(out, "Debug Information:");
        let _ = writeln!(out, "  Model type: {}", debug.model_type);
        let _ = writeln!(out, "  Features shape: ({rows}, {cols})");
        let _ = writeln!(out, "  Prediction: {prediction}");
    }

    out
}

pub fn print_failure(err: &SubmitError) {
    eprint!("{}", render_failure(err));
}
