use axum::{extract::State, http::StatusCode};

use crate::{
	extract::{Json, Path, Session},
	model,
	store::Store,
};

/// Reads the star state of a post as seen by `starer`.
async fn star_state(
	store: &Store,
	starer: model::User,
	post_id: i64,
) -> Result<model::Star, crate::Error> {
	let stars_count = store.post().stars_count(post_id).await?;
	let is_starred = store.post().is_starred_by_user(starer.id, post_id).await?;

	Ok(model::Star {
		starer,
		post: model::StarredPost {
			id: post_id,
			stars_count,
			is_starred,
		},
	})
}

/// Stars a post. Starring twice is accepted but changes nothing.
pub async fn give_star(
	State(store): State<Store>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<(StatusCode, Json<model::Star>), crate::Error> {
	let created = store.star().create(session.user.id, path.id).await?;
	let status = if created {
		StatusCode::CREATED
	} else {
		StatusCode::ACCEPTED
	};

	Ok((status, Json(star_state(&store, session.user, path.id).await?)))
}

/// Removes a star from a post, if there is one.
pub async fn take_star(
	State(store): State<Store>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<(StatusCode, Json<model::Star>), crate::Error> {
	let removed = store.star().delete(session.user.id, path.id).await?;
	let status = if removed {
		StatusCode::OK
	} else {
		StatusCode::ACCEPTED
	};

	Ok((status, Json(star_state(&store, session.user, path.id).await?)))
}
