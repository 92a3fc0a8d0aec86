//! Shared helpers for the Continental backend's integration tests.

pub mod logging;
