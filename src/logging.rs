use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{GameError, GameResult};
use crate::formatter::FrameFormatter;

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter` when set.
pub fn setup_logging(default_filter: &str) -> GameResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| GameError::Config(format!("Invalid log filter '{default_filter}': {e}")))?;

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(FrameFormatter).with_writer(std::io::stderr))
        .with(filter)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| GameError::Config(format!("Failed to set tracing subscriber: {e}")))
}
