//! JSON body extractor for the lobby routes.
//!
//! Failures become problem+json `BAD_REQUEST` errors instead of actix's
//! plain-text `JsonPayloadError` responses, so clients see one error shape.

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::web::BytesMut;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

/// Lobby bodies are a couple of short strings.
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn bad_request(detail: impl Into<String>) -> AppError {
    AppError::bad_request(ErrorCode::BadRequest, detail)
}

async fn read_body(mut payload: Payload) -> Result<BytesMut, AppError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|_| bad_request("Failed to read request body"))?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(bad_request("Request body too large"));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Client-facing summary; never echoes the body back.
fn describe(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        Category::Data => format!("Invalid request body: {error}"),
        Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let path = req.path().to_string();
        let payload = payload.take();

        Box::pin(async move {
            let body = read_body(payload).await?;
            serde_json::from_slice::<T>(&body)
                .map(ValidatedJson)
                .map_err(|e| {
                    debug!(
                        trace_id = %trace_ctx::trace_id(),
                        path = %path,
                        body_size = body.len(),
                        error = %e,
                        "rejected request body"
                    );
                    bad_request(describe(&e))
                })
        })
    }
}
