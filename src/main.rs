use std::{env, fs::File, sync::Mutex};

use anyhow::Context;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use twenty48::game::Game2048;

// Raw mode owns the screen, so logs go to a file in the temp directory
const LOG_FILE_NAME: &str = "2048.log";

fn main() -> anyhow::Result<()> {
    initialize_logging()?;

    let mut game = Game2048::new();
    game.initialize()?;

    // Only returns on a terminal failure; quitting exits from the input thread
    let result = game.play();
    game.restore()?;
    result
}

/// Logging is off unless RUST_LOG holds a level or target directives
/// that enable something. Anything unparseable is ignored.
fn initialize_logging() -> anyhow::Result<()> {
    let filter = match env::var("RUST_LOG").ok().as_deref().and_then(log_filter) {
        Some(filter) => filter,
        None => return Ok(()),
    };

    let path = env::temp_dir().join(LOG_FILE_NAME);
    let file = File::create(&path).with_context(|| format!("Error creating log file {}", path.display()))?;

    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(())
}

fn log_filter(directives: &str) -> Option<Targets> {
    if directives.trim().is_empty() {
        return None;
    }

    let filter: Targets = directives.parse().ok()?;

    let default_off = filter.default_level().map_or(true, |level| level == LevelFilter::OFF);
    let targets_off = filter.iter().all(|(_, level)| level == LevelFilter::OFF);

    if default_off && targets_off {
        None
    } else {
        Some(filter)
    }
}
