use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
	auth,
	extract::{Json, Path, Session},
	model,
	store::Store,
	AppState,
};

/// Registers a new account.
pub async fn create_user(
	State(state): State<AppState>,
	Json(input): Json<model::SignupInput>,
) -> Result<impl IntoResponse, crate::Error> {
	let encrypted_password = auth::hash_password(&state.hasher, &input.password)?;

	let user = state
		.store
		.user()
		.create(model::NewUser {
			email: input.email,
			username: input.username,
			encrypted_password,
		})
		.await?;

	tracing::info!(user_id = user.id, "user created");

	Ok((StatusCode::CREATED, Json(user)))
}

/// Returns the public profile of a user.
pub async fn get_user(
	State(store): State<Store>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Profile>, crate::Error> {
	let user = store.user().find(path.id).await?;

	Ok(Json(model::Profile {
		user: (&user).into(),
	}))
}

/// Returns the authenticated user.
pub async fn whoami(session: Session) -> Json<model::User> {
	Json(session.user)
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_signup() {
		let server = server(state());

		let response = server
			.post("/users")
			.json(&json!({
				"email": "john@smith.com",
				"username": "john",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::CREATED);

		let user = response.json::<Value>();

		assert_eq!(user["email"], "john@smith.com");
		assert_eq!(user["username"], "john");
		assert!(user["id"].is_i64());
		assert!(user.get("password").is_none());
		assert!(user.get("encrypted_password").is_none());
	}

	#[tokio::test]
	async fn test_duplicate_email() {
		let server = server(state());

		signup(&server, "john@smith.com", "john").await;

		let response = server
			.post("/users")
			.json(&json!({
				"email": "john@smith.com",
				"username": "johnny",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(response.json::<Value>()["error"], "email already taken");
	}

	#[tokio::test]
	async fn test_signup_validation() {
		let server = server(state());

		let response = server
			.post("/users")
			.json(&json!({
				"email": "not an email",
				"username": "john",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
		assert!(response.json::<Value>()["error"]
			.as_str()
			.unwrap()
			.starts_with("email: "));
	}

	#[tokio::test]
	async fn test_malformed_body() {
		let server = server(state());

		let response = server
			.post("/users")
			.content_type("application/json")
			.bytes("{ not json".into())
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert!(response.json::<Value>()["error"].is_string());
	}

	#[tokio::test]
	async fn test_get_user_profile() {
		let server = server(state());
		let user = signup(&server, "john@smith.com", "john").await;

		let response = server.get(&format!("/user/{}", user["id"])).await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let profile = response.json::<Value>();

		assert_eq!(profile["user"]["username"], "john");
		assert_eq!(profile["user"]["id"], user["id"]);
		assert!(profile["user"].get("email").is_none());
	}

	#[tokio::test]
	async fn test_get_user_invalid_id() {
		let server = server(state());

		let response = server.get("/user/abc").await;

		assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
	}

	#[tokio::test]
	async fn test_whoami() {
		let server = server(state());

		let response = server.get("/private/whoami").await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["error"], "not authenticated");

		login_new(&server, "john@smith.com", "john").await;

		let response = server.get("/private/whoami").await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["email"], "john@smith.com");
	}
}
