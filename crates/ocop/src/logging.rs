//! Subscriber setup for binaries built on the client core.

use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::OcopError;

/// Installs a global `fmt` subscriber.
///
/// With `verbose` everything at `debug` and above is shown. Otherwise
/// `RUST_LOG` is honoured, with `info` as the floor.
///
/// # Errors
/// [`OcopError::Logging`] if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), OcopError> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(verbose))
        .try_init()?;
    Ok(())
}
