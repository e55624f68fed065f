use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use broiler_growth_forecaster::{
    analysis::{resolve_target_day, Forecaster, GrowthCurve, Selection},
    io,
    models::{Algorithm, ObservationSet, Scenario},
    registry::ModelRegistry,
    visualization::{
        print_curve_table, print_growth_chart, print_model_table, print_prediction_table,
        print_target_summary,
    },
};

#[derive(Parser)]
#[command(
    name = "growth-forecaster",
    about = "Broiler Growth Forecaster - weight prediction and target-day estimation",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the models in a model store
    Models {
        /// Model store directory (contains models.toml)
        #[arg(short, long)]
        store: PathBuf,
    },

    /// Predict future weights for a batch
    Predict {
        /// Model store directory (contains models.toml)
        #[arg(short, long)]
        store: PathBuf,

        /// Scenario: a, b, or single
        #[arg(long, default_value = "a")]
        scenario: String,

        /// Algorithm for scenarios a/b: ridge or xgb
        #[arg(short, long, default_value = "ridge")]
        algorithm: String,

        /// Weighing as DAY=GRAMS (repeatable)
        #[arg(long = "obs", value_parser = parse_day_weight)]
        observations: Vec<(u32, f64)>,

        /// Read weighings from a CSV (day,weight_g) or JSON file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Batch age in days (scenario b)
        #[arg(long)]
        age: Option<u32>,

        /// Target weight in grams to resolve to a day
        #[arg(short, long)]
        target: Option<f64>,

        /// Write the sampled growth curve to a CSV file
        #[arg(long)]
        export_csv: Option<PathBuf>,

        /// Print the forecast as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Interpolate a curve through given points, without models
    Curve {
        /// Point as DAY=GRAMS (repeatable, at least two)
        #[arg(long = "point", value_parser = parse_day_weight, required = true)]
        points: Vec<(u32, f64)>,

        /// First day to sample (defaults to the first point)
        #[arg(long)]
        from: Option<u32>,

        /// Last day to sample (defaults to the last point)
        #[arg(long)]
        to: Option<u32>,

        /// Target weight in grams to resolve to a day
        #[arg(short, long)]
        target: Option<f64>,
    },
}

fn parse_day_weight(s: &str) -> Result<(u32, f64), String> {
    let (day, grams) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DAY=GRAMS, got '{s}'"))?;
    let day = day
        .trim()
        .parse()
        .map_err(|_| format!("invalid day '{day}'"))?;
    let grams = grams
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{grams}'"))?;
    Ok((day, grams))
}

fn selection_for(scenario: &str, algorithm: &str) -> Result<Selection> {
    let scenario: Scenario = scenario.parse()?;
    Ok(match scenario {
        Scenario::SingleDayVector => Selection::DayLabels,
        _ => Selection::Variant {
            scenario,
            algorithm: algorithm.parse::<Algorithm>()?,
        },
    })
}

fn collect_observations(
    input: Option<&PathBuf>,
    pairs: &[(u32, f64)],
    age: Option<u32>,
) -> Result<ObservationSet> {
    let mut observations = match input {
        Some(path) => io::reader_for(path)?
            .read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => ObservationSet::new(),
    };
    for &(day, grams) in pairs {
        observations.insert(day, grams)?;
    }
    if age.is_some() {
        observations.batch_age = age;
    }
    if observations.is_empty() {
        anyhow::bail!("No weighings given. Use --obs DAY=GRAMS or --input FILE");
    }
    Ok(observations)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Models { store } => {
            let registry = ModelRegistry::load(&store)?;
            println!(
                "\n{}",
                format!("Model Store: {}", store.display()).bold().cyan()
            );
            print_model_table(&registry);
        }

        Commands::Predict {
            store,
            scenario,
            algorithm,
            observations,
            input,
            age,
            target,
            export_csv,
            json,
        } => {
            let selection = selection_for(&scenario, &algorithm)?;
            let observations = collect_observations(input.as_ref(), &observations, age)?;
            let registry = ModelRegistry::load(&store)?;

            let forecast = Forecaster::new(&registry).forecast(selection, &observations, target)?;

            if json {
                println!("{}", io::forecast_to_json(&forecast, true)?);
            } else {
                println!(
                    "\n{}",
                    format!("Growth Forecast ({selection})").bold().cyan()
                );
                print_prediction_table(&forecast);
                print_growth_chart(&forecast);
                if let Some(target) = &forecast.target {
                    print_target_summary(target);
                }
            }

            if let Some(path) = export_csv {
                io::write_curve_csv(forecast.curve.sample(forecast.chart_days()), &path)?;
                if !json {
                    println!(
                        "{} Curve written to {}",
                        "Success:".green().bold(),
                        path.display()
                    );
                }
            }
        }

        Commands::Curve {
            points,
            from,
            to,
            target,
        } => {
            let points: Vec<(f64, f64)> = points
                .into_iter()
                .map(|(day, grams)| (f64::from(day), grams))
                .collect();
            let curve = GrowthCurve::fit(&points)?;
            let (first, last) = curve.domain();
            let from = from.unwrap_or(first as u32);
            let to = to.unwrap_or(last as u32);
            if from > to {
                anyhow::bail!("--from ({from}) must not be after --to ({to})");
            }

            print_curve_table(curve.sample(from..=to));
            if let Some(grams) = target {
                print_target_summary(&resolve_target_day(&points, grams)?);
            }
        }
    }

    Ok(())
}
