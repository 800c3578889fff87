//! Diagnostic logging setup.

use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::LOG_ENV;

/// Install a stderr subscriber filtered by `EJOURNAL_LOG` (default `warn`).
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set subscriber: {}", e))
}
