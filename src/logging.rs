//! Tracing subscriber setup
//!
//! Logs go to stderr so stdout only carries the rendered lists. `RUST_LOG`
//! overrides the level picked from `--verbose`.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let default_level = if verbose { "t2l=debug" } else { "t2l=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
