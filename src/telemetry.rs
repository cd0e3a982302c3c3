//! Logging setup and the error sink the client reports failures to.

use color_eyre::{eyre::eyre, Result};
use std::fmt;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter};

/// Side channel for errors and breadcrumbs.
///
/// Reporting never fails and never changes what the caller gets back.
pub trait ErrorSink: Send + Sync {
  /// Record a non-fatal error together with key/value context.
  fn log_error(&self, error: &dyn fmt::Display, context: &[(&str, &str)]);

  /// Record a breadcrumb under a category (e.g. `API_CACHE`).
  fn log_breadcrumb(&self, message: &str, category: &str);
}

/// Error sink that writes to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
  fn log_error(&self, error: &dyn fmt::Display, context: &[(&str, &str)]) {
    let context = format_context(context);
    tracing::error!(context = %context, "{}", error);
  }

  fn log_breadcrumb(&self, message: &str, category: &str) {
    tracing::info!(target: "breadcrumb", "[{}] {}", category, message);
  }
}

fn format_context(context: &[(&str, &str)]) -> String {
  context
    .iter()
    .map(|(k, v)| format!("{}={}", k, v))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Install the global subscriber.
///
/// Logs go to a daily-rolling file under `log_dir`; with `verbose` they are
/// mirrored to stderr. The returned guard must be held until exit so buffered
/// lines get flushed.
pub fn init(log_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
  std::fs::create_dir_all(log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("cready=info,breadcrumb=info"));

  let file_appender = tracing_appender::rolling::daily(log_dir, "cready.log");
  let (writer, guard) = tracing_appender::non_blocking(file_appender);

  let file_layer = fmt_layer::layer().with_writer(writer).with_ansi(false);
  let stderr_layer = verbose.then(|| fmt_layer::layer().with_writer(std::io::stderr));

  tracing_subscriber::registry()
    .with(filter)
    .with(file_layer)
    .with(stderr_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}
