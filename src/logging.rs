//! Diagnostics go to stderr; stdout carries only the HAR document.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity switch.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "har_replay=debug" } else { "har_replay=warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init()
        .map_err(|err| anyhow!(err))
}
