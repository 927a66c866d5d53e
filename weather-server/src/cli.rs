use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{Config, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather history HTTP backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Listen address; overrides WEATHER_BIND and the config file.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Store the history API key (and optionally a listen address) in the config file.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind } => {
                let mut config = Config::load()?;
                config.apply_env();
                if let Some(bind) = bind {
                    config.bind = Some(bind);
                }

                let service = WeatherService::from_config(&config)?;
                let addr = config.bind_addr().to_owned();
                weather_server::run_http_server(service, &addr)
                    .await
                    .with_context(|| format!("HTTP server on {addr} failed"))?;
            }
            Command::Configure => configure()?,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let bind = Text::new("Listen address:")
        .with_default(config.bind_addr())
        .prompt()
        .context("Failed to read listen address")?;

    config.api_key = Some(api_key.trim().to_string());
    config.bind = Some(bind);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
