use std::time::Duration;

/// Settings threaded through a single replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Keep raw header text, protocol trace lines and body-size echoes in the output.
    pub verbose: bool,
    /// Overall transfer timeout handed to the transport.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(verbose: bool, timeout_secs: Option<u64>) -> Self {
        Self {
            verbose,
            timeout: timeout_secs.map(Duration::from_secs),
        }
    }
}
