//! Utility functions used by the ADN CLI.

use std::{error::Error, io};

/// Where log lines go.
#[derive(Default)]
pub enum LogDestination {
    Stdout,
    /// Keeps stdout free for the emitted plan.
    #[default]
    Stderr,
}

#[cfg(feature = "tracing")]
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogDestination {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Self::Stdout => Box::new(io::stdout().lock()),
            Self::Stderr => Box::new(io::stderr().lock()),
        }
    }
}

/// Initialize the tracing logger.
///
/// The filter is read from `RUST_LOG`.
pub fn init_logger(dst: LogDestination) {
    #[cfg(not(feature = "tracing"))]
    {
        let _ = dst;
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "warning: `RUST_LOG` is set, but \"tracing\" support was not enabled at compile time"
            );
        }
    }

    #[cfg(feature = "tracing")]
    if let Err(e) = try_init_logger(dst) {
        eprintln!("warning: couldn't initialize the logger: {e}");
    }
}

#[cfg(feature = "tracing")]
fn try_init_logger(dst: LogDestination) -> Result<(), String> {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(dst))
        .try_init()
        .map_err(|e| e.to_string())
}

/// Prints `err` and its chain of sources to stderr.
pub fn report(err: &dyn Error) {
    let mut msg = format!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    eprintln!("{msg}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_config::Opts;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Opts::command().debug_assert();
    }

    #[test]
    fn report_does_not_panic() {
        let err = crate::CliError::Read("chain.yaml".into(), io::ErrorKind::NotFound.into());
        assert!(err.source().is_some());
        report(&err);
    }
}
