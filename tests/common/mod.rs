//! Shared test setup.
//!
//! `init_tracing` installs a console subscriber once per test binary. Events
//! are only emitted when the crate is built with `--features tracing`:
//!
//! ```bash
//! RUST_LOG=bitradix=trace cargo test --features tracing -- --nocapture
//! ```

#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "bitradix=info";

pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // Another harness may already have installed a subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .compact()
            .try_init();
    });
}
