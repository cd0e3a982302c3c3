mod api;
mod app;
mod cache;
mod commands;
mod config;
mod db;
mod network;
mod telemetry;

use clap::Parser;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = commands::Cli::parse();

  // Must outlive every log call so buffered lines are flushed
  let log_guard = telemetry::init(&db::data_dir()?.join("logs"), cli.verbose)?;

  // Load configuration
  let config = config::Config::load(cli.config.as_deref())?;

  let flags = app::Flags {
    offline: cli.offline,
    ephemeral: cli.ephemeral,
  };
  let app = app::App::new(&config, flags)?;

  let succeeded = app.run(cli.command).await?;
  drop(log_guard);

  if !succeeded {
    std::process::exit(1);
  }

  Ok(())
}
