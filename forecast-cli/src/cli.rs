use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use forecast_core::{City, Config, DateWindow, Forecaster};
use inquire::{Confirm, DateSelect, Select, Text};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "City weather prediction CLI")]
pub struct Cli {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the `Classifier<City>.model` files; overrides the config.
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict the weather for a city and date. Missing inputs are prompted for.
    Predict {
        /// City name, "Bengaluru" or "Austin".
        #[arg(long)]
        city: Option<String>,

        /// Date as YYYY-MM-DD, between today and 7 days from now.
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Interactive form: pick a city and a date, submit, repeat.
    App,

    /// Set the default city, model directory and model caching.
    Configure,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(dir) = self.model_dir {
            config.model_dir = Some(dir);
        }

        match self.command {
            Command::Predict { city, date, format } => {
                let window = DateWindow::today();
                let city = match city {
                    Some(name) => City::try_from(name.as_str())?,
                    None => prompt_city(config.default_city_id()?)?,
                };
                let date = match date {
                    Some(date) => window.check(date)?,
                    None => prompt_date(&window)?,
                };

                let mut forecaster = Forecaster::from_config(&config);
                match forecaster.submit(city, date) {
                    Ok(report) => output::print_report(&report, format)?,
                    Err(e) => {
                        output::print_failure(&e);
                        return Err(e.into());
                    }
                }
            }
            Command::App => run_app(&config)?,
            Command::Configure => configure(config)?,
        }

        Ok(())
    }
}

fn prompt_city(default: City) -> anyhow::Result<City> {
    let cities = City::all().to_vec();
    let start = cities.iter().position(|c| *c == default).unwrap_or(0);

    Ok(Select::new("City", cities).with_starting_cursor(start).prompt()?)
}

fn prompt_date(window: &DateWindow) -> anyhow::Result<NaiveDate> {
    Ok(DateSelect::new("Date")
        .with_starting_date(window.min)
        .with_min_date(window.min)
        .with_max_date(window.max)
        .prompt()?)
}

fn run_app(config: &Config) -> anyhow::Result<()> {
    let mut forecaster = Forecaster::from_config(config);
    let default_city = config.default_city_id()?;

    println!("Select city and date for weather prediction");
    loop {
        let city = prompt_city(default_city)?;
        let date = prompt_date(&DateWindow::today())?;

        match forecaster.submit(city, date) {
            Ok(report) => output::print_report(&report, OutputFormat::Text)?,
            Err(e) => output::print_failure(&e),
        }

        if !Confirm::new("Predict again?").with_default(true).prompt()? {
            break;
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let city = prompt_city(config.default_city_id().unwrap_or_default())?;
    config.set_default_city(city);

    let current_dir = config.model_dir().display().to_string();
    let dir = Text::new("Model directory").with_default(&current_dir).prompt()?;
    config.model_dir = Some(PathBuf::from(dir.trim()));

    config.cache_models = Confirm::new("Keep loaded models between predictions?")
        .with_default(config.cache_models)
        .prompt()?;

    config.save().context("Failed to save configuration")?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
