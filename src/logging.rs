//! Log output shared by both binaries.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Install the stdout subscriber. INFO by default, `RUST_LOG` overrides.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(std::io::stdout)
        .init();
}
