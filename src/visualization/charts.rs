use colored::Colorize;

use crate::analysis::Forecast;

const BAR_WIDTH: usize = 40;
const MAX_ROWS: usize = 25;

/// Format a text bar chart of the growth curve as a string.
///
/// Observed days are drawn in blue, predicted days in green, and interpolated
/// days in the default colour. The row nearest the target day is marked.
pub fn format_growth_chart(forecast: &Forecast) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Growth Curve".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let days = forecast.chart_days();
    let span = (*days.end()).saturating_sub(*days.start()) as usize + 1;
    let step = span.div_ceil(MAX_ROWS).max(1);
    let samples: Vec<(u32, f64)> = forecast.curve.sample(days).step_by(step).collect();

    let max_weight = samples.iter().map(|s| s.1).fold(0.0f64, f64::max);
    if max_weight <= 0.0 {
        output.push_str("  No data available.\n");
        return output;
    }

    let target_day = forecast
        .target
        .map(|t| t.estimated_day)
        .filter(|d| d.is_finite());

    output.push_str(&format!("  {:>5}  {:>9}  Weight\n", "Day", "Grams"));
    output.push_str(&format!("  {}\n", "-".repeat(60)));

    for (day, weight) in samples {
        let bar_len = ((weight.max(0.0) / max_weight) * BAR_WIDTH as f64).round() as usize;
        let bar = "\u{2588}".repeat(bar_len);
        let bar = if forecast.observations.weight(day).is_some() {
            bar.blue()
        } else if forecast.prediction.weight_on(day).is_some() {
            bar.green()
        } else {
            bar.normal()
        };
        let marker = match target_day {
            Some(t) if (f64::from(day) - t).abs() < step as f64 / 2.0 + f64::EPSILON => {
                " \u{25c0} target".yellow().to_string()
            }
            _ => String::new(),
        };
        output.push_str(&format!("  {day:>5}  {weight:>9.1}  {bar}{marker}\n"));
    }

    output.push('\n');
    output
}

/// Print a text bar chart of the growth curve.
pub fn print_growth_chart(forecast: &Forecast) {
    print!("{}", format_growth_chart(forecast));
}
