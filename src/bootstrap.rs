//! Process start-up helpers shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter variable; defaults to `info` when unset.
pub const LOG_VAR: &str = "BOOKSTORE_LOG";

/// Initialize tracing with the `BOOKSTORE_LOG` filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
