use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::Forecast;
use crate::models::TargetEstimate;
use crate::registry::ModelRegistry;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Format observed and predicted weights as a string, one row per day.
pub fn format_prediction_table(forecast: &Forecast) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Weight Forecast".bold().green()));
    output.push_str(&format!(
        "{}\n",
        format!("Scenario: {}", forecast.scenario).dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Day", "Weight (g)", "Source", "Daily Gain (g/day)"]);

    let mut rows: Vec<(u32, f64, &str)> = forecast
        .observations
        .points()
        .into_iter()
        .map(|(d, w)| (d, w, "observed"))
        .collect();
    rows.extend(
        forecast
            .prediction
            .points
            .iter()
            .filter(|p| forecast.observations.weight(p.day).is_none())
            .map(|p| (p.day, p.weight, "predicted")),
    );
    rows.sort_by_key(|r| r.0);

    let mut previous: Option<(u32, f64)> = None;
    for (day, weight, source) in rows {
        let gain = match previous {
            Some((d0, w0)) if day > d0 => format!("{:.1}", (weight - w0) / f64::from(day - d0)),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(day),
            Cell::new(format!("{weight:.1}")),
            Cell::new(source),
            Cell::new(gain),
        ]);
        previous = Some((day, weight));
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the weight forecast table.
pub fn print_prediction_table(forecast: &Forecast) {
    print!("{}", format_prediction_table(forecast));
}

/// Format a target-day estimate as a short summary.
pub fn format_target_summary(target: &TargetEstimate) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Target Weight".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));
    output.push_str(&format!(
        "  {:.0} g reached on day {:.1}\n",
        target.target_weight, target.estimated_day
    ));
    if !target.monotonic {
        output.push_str(&format!(
            "  {}\n",
            "Warning: weights do not rise steadily; this estimate may be unreliable.".yellow()
        ));
    }
    output
}

pub fn print_target_summary(target: &TargetEstimate) {
    print!("{}", format_target_summary(target));
}

/// Format the registry contents as a string.
pub fn format_model_table(registry: &ModelRegistry) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Registered Models".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Model", "Scenario", "Inputs", "Output Days"]);
    for variant in registry.variants() {
        let days = variant
            .output_days()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(variant.key()),
            Cell::new(variant.scenario()),
            Cell::new(variant.input_dim()),
            Cell::new(days),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

pub fn print_model_table(registry: &ModelRegistry) {
    print!("{}", format_model_table(registry));
}

/// Format a sampled curve as a day/weight table.
pub fn format_curve_table(samples: impl IntoIterator<Item = (u32, f64)>) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Interpolated Curve".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Day", "Weight (g)"]);
    for (day, weight) in samples {
        table.add_row(vec![Cell::new(day), Cell::new(format!("{weight:.1}"))]);
    }

    output.push_str(&format!("{table}"));
    output
}

pub fn print_curve_table(samples: impl IntoIterator<Item = (u32, f64)>) {
    print!("{}", format_curve_table(samples));
}
