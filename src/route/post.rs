use axum::{
	extract::{rejection::JsonRejection, State},
	http::StatusCode,
	response::IntoResponse,
};
use validator::Validate;

use crate::{
	auth,
	extract::{Json, Path, Query, Session},
	model,
	store::Store,
};

/// Returns every post, newest first.
pub async fn get_posts(
	State(store): State<Store>,
	session: Option<Session>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<model::Items<Vec<model::Post>>>, crate::Error> {
	let viewer = session.as_ref().map(|session| session.user.id);
	let posts = store.post().find_all(viewer, &paginate).await?;

	Ok(Json(model::Items { items: posts }))
}

/// Returns a single post.
pub async fn get_post(
	State(store): State<Store>,
	session: Option<Session>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Items<model::Post>>, crate::Error> {
	let viewer = session.as_ref().map(|session| session.user.id);
	let post = store.post().find(path.id, viewer).await?;

	Ok(Json(model::Items { items: post }))
}

/// Returns the posts written by a user, newest first. Unknown users have none.
pub async fn get_user_posts(
	State(store): State<Store>,
	session: Option<Session>,
	Path(path): Path<model::IdInput>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<model::Items<Vec<model::Post>>>, crate::Error> {
	let viewer = session.as_ref().map(|session| session.user.id);
	let posts = store
		.post()
		.find_by_author(path.id, viewer, &paginate)
		.await?;

	Ok(Json(model::Items { items: posts }))
}

pub async fn create_post(
	State(store): State<Store>,
	session: Session,
	Json(input): Json<model::PostInput>,
) -> Result<impl IntoResponse, crate::Error> {
	let post = store.post().create(&session.user, &input).await?;

	tracing::info!(post_id = post.id, author_id = session.user.id, "post created");

	Ok((StatusCode::CREATED, Json(post)))
}

/// Replaces the header and text of a post. Only its author may do this.
///
/// The body is validated after the author check, so other users are told
/// they have no permission regardless of what they sent.
pub async fn update_post(
	State(store): State<Store>,
	session: Session,
	Path(path): Path<model::IdInput>,
	payload: Result<axum::Json<model::PostInput>, JsonRejection>,
) -> Result<Json<model::Post>, crate::Error> {
	let post = store.post().find(path.id, Some(session.user.id)).await?;

	auth::ensure_author(&post, &session.user)?;

	let axum::Json(input) = payload?;

	input.validate()?;
	store.post().update(post.id, &input).await?;

	let post = store.post().find(post.id, Some(session.user.id)).await?;

	Ok(Json(post))
}

/// Deletes a post and its stars. Only its author may do this.
pub async fn delete_post(
	State(store): State<Store>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<StatusCode, crate::Error> {
	let post = store.post().find(path.id, None).await?;

	auth::ensure_author(&post, &session.user)?;

	store.post().delete(post.id).await?;

	tracing::info!(post_id = post.id, "post deleted");

	Ok(StatusCode::OK)
}
