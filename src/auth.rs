use std::sync::OnceLock;

use argon2::{
	password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use axum::{
	body::Body,
	extract::{Request, State},
	http::{Response, StatusCode},
	middleware::Next,
	response::IntoResponse,
};
use uuid::Uuid;

use crate::{model, store, AppState};

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("incorrect email or password")]
	IncorrectEmailOrPassword,
	#[error("not authenticated")]
	NotAuthenticated,
	#[error("no permission")]
	NoPermission,
	#[error("password hashing error")]
	Hash(password_hash::Error),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::IncorrectEmailOrPassword | Self::NotAuthenticated | Self::NoPermission => {
				StatusCode::UNAUTHORIZED
			}
			Self::Hash(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		crate::Error::from(self).into_response()
	}
}

/// Hashes a password with Argon2 into a PHC string, salted with a random uuid.
pub fn hash_password(hasher: &Argon2, password: &str) -> Result<String, Error> {
	let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(Error::Hash)?;

	hasher
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(Error::Hash)
}

/// Checks a password against a PHC string produced by [`hash_password`].
pub fn verify_password(hasher: &Argon2, password: &str, encrypted: &str) -> bool {
	PasswordHash::new(encrypted)
		.is_ok_and(|hash| hasher.verify_password(password.as_bytes(), &hash).is_ok())
}

/// Runs a verification against a throwaway hash, for logins naming an email
/// that has no account. Always returns `false`.
///
/// Login then takes as long for unknown emails as for wrong passwords.
pub fn verify_dummy_password(hasher: &Argon2, password: &str) -> bool {
	static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

	let hash = DUMMY_HASH.get_or_init(|| hash_password(hasher, "not a real password").ok());

	if let Some(hash) = hash {
		verify_password(hasher, password, hash);
	}

	false
}

/// Attaches the user of a valid session cookie to the request.
///
/// Requests without a session, or with one that no longer resolves to a user,
/// continue anonymously.
pub async fn authenticate(
	State(state): State<AppState>,
	mut request: Request,
	next: Next,
) -> Response<Body> {
	if let Some(user_id) = state.sessions.user_id(request.headers()) {
		match state.store.user().find(user_id).await {
			Ok(user) => {
				request.extensions_mut().insert(user);
			}
			Err(store::Error::RecordNotFound) => {
				tracing::debug!(user_id, "session refers to an unknown user");
			}
			Err(error) => {
				tracing::warn!(user_id, %error, "failed to load session user");
			}
		}
	}

	next.run(request).await
}

/// Rejects requests that [`authenticate`] did not attach a user to.
pub async fn authorize(request: Request, next: Next) -> Result<Response<Body>, Error> {
	if request.extensions().get::<model::User>().is_none() {
		return Err(Error::NotAuthenticated);
	}

	Ok(next.run(request).await)
}

/// Fails with [`Error::NoPermission`] unless `user` wrote `post`.
pub fn ensure_author(post: &model::Post, user: &model::User) -> Result<(), Error> {
	if post.author.id != user.id {
		return Err(Error::NoPermission);
	}

	Ok(())
}
