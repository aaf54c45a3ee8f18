//! dfi-predict - run one DFI prediction from the command line
//!
//! Reads a JSON object of measurement name to value, validates it, calls the
//! linear reference model from the configuration file and prints the result.

use clap::Parser;
use dfi_predict::{
    ApiError, ConfigError, ConfigurationManager, LinearModel, ModelError, OutputFormat, PredictionSession,
    RawMeasurements,
};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// DFI prediction CLI
#[derive(Parser)]
#[command(name = "dfi-predict")]
#[command(about = "Predict the DNA Fragmentation Index from semen-analysis measurements", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DFI_PREDICT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (text, json, csv)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with the measurements
    input: PathBuf,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid measurement file: {0}")]
    Input(#[from] serde_json::Error),
    #[error("no reference_model configured; pass --config with model coefficients")]
    NoModel,
    #[error("invalid reference model: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let manager = match &cli.config {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    let config = manager.get_system_config().clone();

    let model_config = config.reference_model.as_ref().ok_or(CliError::NoModel)?;
    let model = LinearModel::from_config(model_config)?;

    let contents = fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
        path: cli.input.clone(),
        source,
    })?;
    let raw: RawMeasurements = serde_json::from_str(&contents)?;
    debug!(fields = raw.len(), "measurements loaded");

    let mut session = PredictionSession::new(Arc::new(model), config)?;
    let output = match cli.format {
        OutputFormat::Text => session.predict_text(&raw, false)?,
        OutputFormat::Json => session.predict_json(&raw, true)?,
        OutputFormat::Csv => {
            session.predict(&raw)?;
            session.export_history_csv(true)
        }
    };

    Ok(output)
}
