/// Tracing subscriber setup
///
/// The subscriber is built from the loaded [`Config`] rather than from
/// ambient state. `RUST_LOG` still takes precedence over the per-environment
/// filter when set.
///
/// | `APP_ENV` | Format | Default level |
/// |-----------|--------|---------------|
/// | local     | text   | debug         |
/// | dev       | JSON   | debug         |
/// | prod      | JSON   | info          |

use crate::config::{Config, Environment};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the process-wide tracing subscriber
///
/// # Errors
///
/// Fails if a subscriber was already installed.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter()));

    let registry = tracing_subscriber::registry().with(filter);

    match config.environment {
        Environment::Local => registry.with(fmt::layer().with_target(true)).try_init()?,
        Environment::Dev | Environment::Prod => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?,
    }

    Ok(())
}
