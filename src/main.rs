//! Command line shell around the atmofuzz pipeline.
//!
//! ```text
//! atmofuzz [--config <path>] scenarios <file.json> [name]
//! atmofuzz [--config <path>] serve
//! ```
//!
//! A scenario file is a JSON object of named payloads, each shaped like the
//! upstream API response (`current`, `hourly`) plus an optional `comment`.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use atmofuzz::error::{AtmoError, Result};
use atmofuzz::pipeline::{AirQualityPayload, Assessment, Pipeline, StageOutcome};
use atmofuzz::server;
use atmofuzz::settings::Settings;

const USAGE: &str = "usage: atmofuzz [--config <path>] (scenarios <file.json> [name] | serve)";

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, command) = match split_args(&args) {
        Some(split) => split,
        None => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    let settings = match Settings::load(config_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(settings, command).await {
        error!(error=%e, "atmofuzz failed");
        std::process::exit(1);
    }
}

// (--config path, remaining command words)
fn split_args(args: &[String]) -> Option<(Option<&str>, &[String])> {
    match args {
        [flag, path, rest @ ..] if flag == "--config" => Some((Some(path.as_str()), rest)),
        [flag, ..] if flag == "--config" => None,
        rest => Some((None, rest)),
    }
}

async fn run(settings: Settings, command: &[String]) -> Result<()> {
    let pipeline = Pipeline::new(settings)?;
    match command {
        [cmd, file] if cmd == "scenarios" => run_scenarios(&pipeline, file, None),
        [cmd, file, name] if cmd == "scenarios" => {
            run_scenarios(&pipeline, file, Some(name.as_str()))
        }
        [cmd] if cmd == "serve" => serve(pipeline).await,
        _ => Err(AtmoError::Config(USAGE.into())),
    }
}

fn run_scenarios(pipeline: &Pipeline, file: &str, only: Option<&str>) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let scenarios: BTreeMap<String, Value> = serde_json::from_str(&text)?;
    if let Some(name) = only {
        if !scenarios.contains_key(name) {
            return Err(AtmoError::Data(format!("no scenario '{name}' in {file}")));
        }
    }
    info!(file, count = scenarios.len(), "scenarios loaded");
    for (name, raw) in &scenarios {
        if only.is_some_and(|o| o != name) {
            continue;
        }
        let comment = raw.get("comment").and_then(Value::as_str).unwrap_or("no description");
        let payload: AirQualityPayload = serde_json::from_value(raw.clone())?;
        let assessment = pipeline.assess(&payload);
        println!("{}", summary(name, comment, &assessment));
    }
    Ok(())
}

async fn serve(pipeline: Pipeline) -> Result<()> {
    let address = pipeline.settings().server.address.clone();
    let app = server::router(Arc::new(pipeline));
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// absent values become "not computed" here and nowhere earlier
fn summary(name: &str, comment: &str, assessment: &Assessment) -> String {
    let mut lines = vec![format!("== {name} ({comment})")];
    for (label, stage) in [
        ("particle", &assessment.particle),
        ("gas", &assessment.gas),
        ("other", &assessment.other),
    ] {
        lines.push(match stage {
            StageOutcome::Computed(s) => format!("   {label:<9} {:>6.2} ({})", s.score, s.band),
            StageOutcome::Failed(why) | StageOutcome::Skipped(why) => {
                format!("   {label:<9} not computed: {why}")
            }
        });
    }
    lines.push(match &assessment.master {
        StageOutcome::Computed(m) => format!(
            "   current   {:>6.2} AQI ({}) | {}",
            m.aqi, m.band, m.recommendation
        ),
        StageOutcome::Failed(why) | StageOutcome::Skipped(why) => {
            format!("   current   not computed: {why}")
        }
    });
    lines.push(match &assessment.forecast {
        StageOutcome::Computed(f) => match f.peak_period {
            Some(peak) => format!("   forecast  {:>6.2} | {} ({})", f.risk, f.level, peak),
            None => format!("   forecast  {:>6.2} | {}", f.risk, f.level),
        },
        StageOutcome::Failed(why) | StageOutcome::Skipped(why) => {
            format!("   forecast  not computed: {why}")
        }
    });
    lines.join("\n")
}
