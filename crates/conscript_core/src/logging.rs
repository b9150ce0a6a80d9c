//! Tracing setup derived from the configured verbosity flags.

use tracing_subscriber::EnvFilter;

use crate::config::LoaderConfig;

/// Installs a global fmt subscriber filtered by the config's `trace`,
/// `debug`, and `error` flags. All flags off silences the engine.
///
/// Does nothing when the host application already installed a subscriber.
pub fn init(config: &LoaderConfig) {
    let filter = if config.trace {
        EnvFilter::new("trace")
    } else if config.debug {
        EnvFilter::new("debug")
    } else if config.error {
        EnvFilter::new("error")
    } else {
        EnvFilter::new("off")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
