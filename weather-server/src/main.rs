//! Binary crate for the `weather-server` backend.
//!
//! This crate focuses on:
//! - Loading `.env`, config file and environment
//! - Parsing CLI arguments and interactive configuration
//! - Running the axum server

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    weather_server::init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
