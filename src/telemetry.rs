//! Logging initialisation.

use crate::config::LogFormat;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser failure.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// A global subscriber has already been installed.
    #[error("global tracing subscriber already installed: {0}")]
    AlreadyInitialised(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `directive` when it is set, so operators
/// can raise verbosity without touching the tracker configuration.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the directive is invalid or a subscriber
/// is already installed.
pub fn init_tracing(directive: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = build_filter(directive)?;
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }
    Ok(())
}

fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
        directive: directive.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{TelemetryError, build_filter, init_tracing};
    use crate::config::LogFormat;

    #[test]
    fn accepts_crate_level_directive() {
        assert!(build_filter("defectflow=debug,diesel=warn").is_ok());
    }

    #[test]
    fn second_initialisation_is_reported() {
        // The first call may lose the race against other tests in this binary.
        let _first = init_tracing("defectflow=info", LogFormat::Pretty);
        let second = init_tracing("defectflow=info", LogFormat::Json);

        assert!(matches!(second, Err(TelemetryError::AlreadyInitialised(_))));
    }
}
