//! Tracing setup for the `medtrack` binary and the core's unit tests.
//!
//! The CLI prints its results (medication lists, schedules, exported row
//! counts) on stdout. Everything emitted through `tracing` goes to stderr,
//! so piping `medtrack calendar` into another tool only carries the table.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Store mutations and snapshot fallbacks at `info`, the CLI's default
pub fn init() {
    init_with_level("info")
}

/// Install a compact stderr subscriber filtered at `default_level`
///
/// `medtrack --verbose` passes `"debug"` to also show dose upserts and
/// snapshot reads/writes. A `RUST_LOG` value in the environment wins over
/// `default_level`.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level logs routed through the test harness's captured output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
