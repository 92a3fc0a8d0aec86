//! Test logging for integration test binaries.
//!
//! Each binary under `tests/` installs it from a `ctor` hook in
//! `tests/common/mod.rs`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

const DEFAULT_DIRECTIVE: &str = "warn";

/// `TEST_LOG` wins over `RUST_LOG`; blank values count as unset.
pub fn filter_directive(test_log: Option<String>, rust_log: Option<String>) -> String {
    [test_log, rust_log]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Install the test subscriber once. Safe to call from every test.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let directive = filter_directive(
            std::env::var("TEST_LOG").ok(),
            std::env::var("RUST_LOG").ok(),
        );
        let filter =
            EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
