//! Logging setup.

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_filter` when unset.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(default_filter: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let installed = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        debug!("logging initialised");
    }
}
