use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
	auth,
	extract::Json,
	model,
	session::{self, Sessions},
	store, AppState,
};

/// Logs a user in, setting a signed session cookie.
///
/// An unknown email and a wrong password produce the same error.
pub async fn create_session(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<impl IntoResponse, crate::Error> {
	let user = match state.store.user().find_by_email(&input.email).await {
		Ok(user) => user,
		Err(store::Error::RecordNotFound) => {
			auth::verify_dummy_password(&state.hasher, &input.password);

			return Err(auth::Error::IncorrectEmailOrPassword.into());
		}
		Err(error) => return Err(error.into()),
	};

	if !auth::verify_password(&state.hasher, &input.password, &user.encrypted_password) {
		return Err(auth::Error::IncorrectEmailOrPassword.into());
	}

	tracing::info!(user_id = user.id, remember = input.remember_me, "user logged in");

	let jar = state.sessions.create_cookie(user.id, input.remember_me);

	Ok((session::set_cookie(&jar), StatusCode::OK))
}

/// Logs the current user out by expiring the session cookie.
pub async fn delete_session(State(sessions): State<Sessions>) -> impl IntoResponse {
	(session::set_cookie(&sessions.clear_cookie()), StatusCode::OK)
}
