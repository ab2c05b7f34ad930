#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;

use anyhow::Context;
use tracing::info;

use maid_mayhem::app::{App, Options};
use maid_mayhem::config::GameConfig;
use maid_mayhem::logging::setup_logging;

/// Runs one headless session and prints the final frame as JSON.
pub fn main() -> anyhow::Result<()> {
    let options = Options::parse(env::args().skip(1)).context("Failed to parse arguments")?;

    let mut config = GameConfig::load().context("Failed to load configuration")?;
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    setup_logging(&config.log_filter)?;
    info!(?config, "Configuration loaded");

    let mut app = App::new(config, options)?;
    while app.run() {}

    for line in app.game.timing_report() {
        info!("{line}");
    }

    let snapshot = app.game.snapshot();
    info!(score = snapshot.session.score, "Session finished");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
