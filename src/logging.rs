//! Tracing subscriber setup
//!
//! Logs go to stderr so stdout stays clean for command output such as
//! shell completions. `RUST_LOG` overrides the verbosity-derived filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter for the given verbosity
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "geth_builder=debug"
    } else {
        "geth_builder=warn"
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init()
        .ok();
}
