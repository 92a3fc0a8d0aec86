//! Request span carrying `trace_id`, `method`, `path` and, for room routes,
//! the normalized `room` code. Handler, lobby and upgrade logs nest under it.
//!
//! Reads the [`TraceId`] stored by `RequestTrace`, so it must be wrapped
//! before it (actix runs the last `wrap` first).

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{field, info_span, Instrument};

use super::request_trace::TraceId;
use crate::ws::hub::normalize_code;

/// Room code addressed by `path`, if any: `/api/room/{code}` (not the
/// create/join endpoints) or `/api/ws/{code}/{player_id}`.
fn room_in_path(path: &str) -> Option<String> {
    let mut parts = path.trim_start_matches('/').split('/');
    if parts.next() != Some("api") {
        return None;
    }
    let code = match (parts.next(), parts.next()) {
        (Some("room"), Some(code)) if code != "create" && code != "join" => code,
        (Some("ws"), Some(code)) => code,
        _ => return None,
    };
    (!code.is_empty()).then(|| normalize_code(code))
}

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "missing-trace-id".to_string());

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
            room = field::Empty,
        );
        if let Some(room) = room_in_path(req.path()) {
            span.record("room", room.as_str());
        }

        Box::pin(self.service.call(req).instrument(span))
    }
}
