use std::time::Duration;

use axum::http::{header, HeaderValue, Method, Request, Response};
use tower_http::{
	classify::{ServerErrorsAsFailures, SharedClassifier},
	cors::CorsLayer,
	request_id::RequestId,
	trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::Span;

/// Allows credentialed requests from a single origin.
pub fn cors(origin: HeaderValue) -> CorsLayer {
	CorsLayer::new()
		.allow_origin(origin)
		.allow_methods([
			Method::GET,
			Method::POST,
			Method::DELETE,
			Method::PUT,
			Method::OPTIONS,
		])
		.allow_headers([header::CONTENT_TYPE])
		.allow_credentials(true)
}

/// Logs the start and completion of every request inside a span tagged with
/// its request id.
pub fn trace(
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, LogRequest, LogResponse> {
	TraceLayer::new_for_http()
		.make_span_with(RequestSpan)
		.on_request(LogRequest)
		.on_response(LogResponse)
}

#[derive(Clone, Copy)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
	fn make_span(&mut self, request: &Request<B>) -> Span {
		let request_id = request
			.extensions()
			.get::<RequestId>()
			.and_then(|id| id.header_value().to_str().ok())
			.unwrap_or_default();

		tracing::info_span!(
			"request",
			method = %request.method(),
			uri = %request.uri(),
			request_id,
		)
	}
}

#[derive(Clone, Copy)]
pub struct LogRequest;

impl<B> OnRequest<B> for LogRequest {
	fn on_request(&mut self, request: &Request<B>, _span: &Span) {
		tracing::info!("started {} {}", request.method(), request.uri());
	}
}

#[derive(Clone, Copy)]
pub struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
	fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
		let status = response.status();
		let reason = status.canonical_reason().unwrap_or_default();

		if status.is_server_error() {
			tracing::error!("completed with {} {reason} in {latency:?}", status.as_u16());
		} else if status.is_client_error() {
			tracing::warn!("completed with {} {reason} in {latency:?}", status.as_u16());
		} else {
			tracing::info!("completed with {} {reason} in {latency:?}", status.as_u16());
		}
	}
}
