//! CEP weather services.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client                 Service A (entry)              Service B (weather)
//!   ──────  POST /cep  ──▶ validate ── POST /weather ──▶ validate
//!                                      + traceparent      │
//!                                                          ├─▶ ViaCEP     (city)
//!                                                          └─▶ WeatherAPI (temp_C)
//!   ◀──── 200 body / 404 / 422 / 500 ◀── status remap ◀── report | error
//!
//!   Both services ──▶ OTLP/gRPC collector (one connected trace per request)
//! ```
//!
//! Run `cep-weather entry` for Service A and `cep-weather weather` for
//! Service B. Configuration comes from an optional TOML file and the
//! environment (`PORT`, `SERVICE_B_URL`, `WEATHER_API_KEY`,
//! `OTEL_COLLECTOR_URL`, ...).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cep_weather::config::{load_from_env, Role};
use cep_weather::lifecycle;

#[derive(Debug, Parser)]
#[command(name = "cep-weather", version, about = "CEP to temperature services")]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "CEP_WEATHER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the entry service (POST /cep).
    Entry,
    /// Run the weather service (POST /weather).
    Weather,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let role = match cli.command {
        Command::Entry => Role::Entry,
        Command::Weather => Role::Weather,
    };

    let config = load_from_env(cli.config.as_deref(), role)?;
    lifecycle::run(role, config).await?;
    Ok(())
}
