//! This module contains utilities for logging.

use std::io;

use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing_subscriber::{
    EnvFilter,
    filter::ParseError,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// The style to use for logging output.
#[derive(clap::ValueEnum, Clone, Eq, PartialEq, Debug, Copy)]
pub enum LogStyle {
    /// Use plain logging output.
    Plain,
    /// Use JSON logging output.
    Json,
}

/// Constructs a default [`EnvFilter`] that is used when the user did not
/// specify a custom RUST_LOG.
pub fn get_default_env_filter(
    verbose: clap_verbosity_flag::log::LevelFilter,
) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(format!("cfn_check={verbose}"))
}

/// Initializes logging with the given style and verbosity. All log output
/// goes to stderr so rendered documents can go to stdout.
pub fn init_logging(
    log_style: &LogStyle,
    verbosity: &Verbosity<InfoLevel>,
    log_level: Option<tracing::Level>,
) -> Result<(), ParseError> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(format!("cfn_check={level}"))?,
        None => get_default_env_filter(verbosity.log_level_filter())?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_style {
        LogStyle::Plain => {
            registry
                .with(fmt::layer().with_writer(io::stderr).without_time())
                .init();
        }
        LogStyle::Json => {
            registry
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
    }

    Ok(())
}
