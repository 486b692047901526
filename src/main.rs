mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::{ArgGroup, Parser};
use skycast_core::{App, AppError, Config, ConfigError};
use skycast_weather::DailyForecast;

/// Look up the 5-day weather forecast for a city or a position.
#[derive(Debug, Parser)]
#[command(version, about)]
#[command(group(ArgGroup::new("target").required(true).args(["city", "lat", "here"])))]
struct Args {
    /// City name to search for
    city: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Use the position configured under [location]
    #[arg(long)]
    here: bool,

    /// Show the hourly breakdown of one day (1-based index or YYYY-MM-DD)
    #[arg(long)]
    day: Option<String>,

    /// Print the daily summaries as JSON
    #[arg(long)]
    json: bool,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = skycast_core::init() {
        eprintln!("{}", e);
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config = load_config(args.config.as_deref())?;
    let mut app = App::new(config)?;

    if let Some(city) = &args.city {
        app.search_city(city)?;
    } else if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        app.search_coordinates(lat, lon);
    } else if args.here {
        let source = app.config().location.position_source();
        let location = app.use_my_location(source.as_ref()).await?;
        tracing::info!(
            "Using position {:.4}, {:.4}",
            location.latitude,
            location.longitude
        );
    }

    app.settle().await;

    if let Some(message) = app.state().error.clone() {
        return Err(AppError::Service(message));
    }

    let selected = match &args.day {
        Some(day) => {
            let date = resolve_day(&app.state().daily_forecasts, day)
                .ok_or_else(|| AppError::Service(format!("No forecast for day {}", day)))?;
            app.select_day(Some(date.as_str()));
            app.state().selected_day.clone()
        }
        None => None,
    };

    if args.json {
        let json = match &selected {
            Some(day) => serde_json::to_string_pretty(day),
            None => serde_json::to_string_pretty(&app.state().daily_forecasts),
        }
        .map_err(anyhow::Error::from)?;
        println!("{}", json);
        return Ok(());
    }

    match &selected {
        Some(day) => print!("{}", render::hourly_table(day)),
        None => print!(
            "{}",
            render::forecast_list(app.state(), Local::now().date_naive())
        ),
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, AppError> {
    Config::load_validated(path)
        .map(|(config, _)| config)
        .map_err(|e| match e.downcast::<ConfigError>() {
            Ok(config_err) => AppError::Config(config_err),
            Err(other) => AppError::Config(ConfigError::ParseError(format!("{:#}", other))),
        })
}

/// Map a 1-based index or a date key onto a forecast date
fn resolve_day(days: &[DailyForecast], day: &str) -> Option<String> {
    if let Ok(index) = day.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| days.get(i))
            .map(|d| d.date.clone());
    }

    days.iter()
        .find(|d| d.date == day)
        .map(|d| d.date.clone())
}
