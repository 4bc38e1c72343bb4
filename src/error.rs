use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use serde::Serialize;

use crate::{auth, store};

/// Error type for the application.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("auth error: {0}")]
	Auth(#[from] auth::Error),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
	#[error("too many requests")]
	TooManyRequests,
	#[error("rate limit error: {0}")]
	RateLimit(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
	pub error: Cow<'a, str>,
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Path(..) => StatusCode::UNPROCESSABLE_ENTITY,
			Self::Json(..) | Self::Query(..) => StatusCode::BAD_REQUEST,
			Self::Auth(error) => error.status(),
			Self::Store(error) => error.status(),
			Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// The message shown to the client.
	fn message(&self) -> Cow<'_, str> {
		match self {
			Self::Validation(errors) => {
				let mut messages = errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						errors.iter().map(move |error| format!("{field}: {error}"))
					})
					.collect::<Vec<_>>();

				messages.sort();
				messages.join("; ").into()
			}
			Self::Json(error) => error.body_text().into(),
			Self::Path(error) => error.body_text().into(),
			Self::Query(error) => error.body_text().into(),
			Self::Auth(auth::Error::Hash(..))
			| Self::Store(store::Error::Database(..))
			| Self::RateLimit(..) => "internal server error".into(),
			Self::Auth(error) => error.to_string().into(),
			Self::Store(error) => error.to_string().into(),
			Self::TooManyRequests => self.to_string().into(),
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(
			status,
			Json(ErrorResponse {
				error: self.message(),
			}),
		)
			.into_response()
	}
}
