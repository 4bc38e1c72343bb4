use axum::{extract::FromRequestParts, http::request};

use crate::{auth, error::Error, model};

/// The user attached to the request by [`auth::authenticate`].
///
/// If there is none, an [`auth::Error::NotAuthenticated`] is returned. Use
/// `Option<Session>` on routes that also serve anonymous requests.
///
/// ```rust,ignore
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub user: model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let user = parts
			.extensions
			.get::<model::User>()
			.cloned()
			.ok_or(auth::Error::NotAuthenticated)?;

		Ok(Self { user })
	}
}
