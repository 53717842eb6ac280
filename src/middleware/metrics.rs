//! Per-request observability as a Tower layer
//!
//! Every request gets an `x-request-id` (taken from the client or generated),
//! runs inside a span carrying it, and is counted and timed under the route
//! template it matched.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    response::Response,
};
use metrics::{counter, gauge, histogram};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Route label for requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Clone, Copy, Default)]
pub struct ObservabilityLayer;

impl<S> Layer<S> for ObservabilityLayer {
    type Service = Observed<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Observed { inner }
    }
}

#[derive(Clone)]
pub struct Observed<S> {
    inner: S,
}

/// Label the request by its route template so ids in the path do not
/// explode metric cardinality.
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

fn request_id(request: &Request<Body>) -> HeaderValue {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty())
        .cloned()
        .or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("unknown"))
}

impl<S> Service<Request<Body>> for Observed<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let method = request.method().as_str().to_string();
        let route = route_label(&request);
        let request_id = request_id(&request);

        let span = tracing::info_span!(
            "request",
            request_id = request_id.to_str().unwrap_or_default()
        );

        // Take the clone that was driven to readiness, leave a fresh one behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                gauge!("formhub_http_requests_in_flight").increment(1.0);
                let started = Instant::now();
                let result = inner.call(request).await;
                gauge!("formhub_http_requests_in_flight").decrement(1.0);

                let mut response = result?;
                let status = response.status().as_u16().to_string();

                histogram!(
                    "formhub_http_request_duration_seconds",
                    "method" => method.clone(),
                    "route" => route.clone()
                )
                .record(started.elapsed().as_secs_f64());
                counter!(
                    "formhub_http_requests_total",
                    "method" => method,
                    "route" => route,
                    "status" => status
                )
                .increment(1);

                response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
                Ok(response)
            }
            .instrument(span),
        )
    }
}
