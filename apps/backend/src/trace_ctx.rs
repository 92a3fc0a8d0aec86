//! Request trace id, readable anywhere inside the request's task.
//!
//! `RequestTrace` scopes every request with [`with_trace_id`]; error
//! rendering and body extraction read it back with [`trace_id`]. Room and
//! session actors run outside any request and log with their own fields.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

const UNSCOPED: &str = "unknown";

/// The scoped id, if the caller runs inside a request.
pub fn current() -> Option<String> {
    TRACE_ID.try_with(Clone::clone).ok()
}

/// The scoped id, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| UNSCOPED.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
