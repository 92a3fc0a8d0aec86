#![cfg(test)]

//! Test logging for the library's unit tests.
//!
//! Installed once by the `ctor` hook in `lib.rs`. Integration tests use the
//! same filter rules through `backend_test_support::logging`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize structured logging for tests.
///
/// Idempotent. The filter comes from `TEST_LOG`, then `RUST_LOG`, then
/// `"warn"`, so room and session chatter stays quiet unless asked for:
///
/// ```bash
/// TEST_LOG=continental=debug cargo test -p continental room
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
