//! Data access.
//!
//! Each entity has a repository trait; [`Store`] bundles one instance of each
//! and is what the HTTP layer depends on. [`sql`] is the Postgres
//! implementation used in production.

#[cfg(test)]
pub mod memory;
pub mod sql;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::model;

/// An error returned by a repository.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("record not found")]
	RecordNotFound,
	#[error("email already taken")]
	EmailTaken,
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::EmailTaken => StatusCode::UNPROCESSABLE_ENTITY,
			Self::RecordNotFound | Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[async_trait]
pub trait UserRepository: Send + Sync {
	/// Inserts a new user. Fails with [`Error::EmailTaken`] if the email is in use.
	async fn create(&self, user: model::NewUser) -> Result<model::User>;
	async fn find(&self, id: i64) -> Result<model::User>;
	async fn find_by_email(&self, email: &str) -> Result<model::User>;
}

/// Posts are always returned with their star count. `viewer` is the user the
/// post is being shown to, and decides `is_starred`.
#[async_trait]
pub trait PostRepository: Send + Sync {
	async fn create(&self, author: &model::User, input: &model::PostInput) -> Result<model::Post>;
	async fn find(&self, id: i64, viewer: Option<i64>) -> Result<model::Post>;
	/// Newest first.
	async fn find_all(
		&self,
		viewer: Option<i64>,
		paginate: &model::Paginate,
	) -> Result<Vec<model::Post>>;
	/// Newest first.
	async fn find_by_author(
		&self,
		author: i64,
		viewer: Option<i64>,
		paginate: &model::Paginate,
	) -> Result<Vec<model::Post>>;
	async fn update(&self, id: i64, input: &model::PostInput) -> Result<()>;
	/// Deletes the post along with its stars.
	async fn delete(&self, id: i64) -> Result<()>;
	async fn is_starred_by_user(&self, user_id: i64, post_id: i64) -> Result<bool>;
	async fn stars_count(&self, post_id: i64) -> Result<i64>;
}

#[async_trait]
pub trait StarRepository: Send + Sync {
	/// Stars a post, returning `false` if the user had already starred it.
	async fn create(&self, user_id: i64, post_id: i64) -> Result<bool>;
	/// Removes a star, returning `false` if there was nothing to remove.
	async fn delete(&self, user_id: i64, post_id: i64) -> Result<bool>;
}

/// The repositories handed to request handlers.
///
/// All repositories are built up front and shared behind an [`Arc`], so
/// cloning the store is cheap.
#[derive(Clone)]
pub struct Store {
	users: Arc<dyn UserRepository>,
	posts: Arc<dyn PostRepository>,
	stars: Arc<dyn StarRepository>,
}

impl Store {
	pub fn new(
		users: Arc<dyn UserRepository>,
		posts: Arc<dyn PostRepository>,
		stars: Arc<dyn StarRepository>,
	) -> Self {
		Self {
			users,
			posts,
			stars,
		}
	}

	pub fn user(&self) -> &dyn UserRepository {
		self.users.as_ref()
	}

	pub fn post(&self) -> &dyn PostRepository {
		self.posts.as_ref()
	}

	pub fn star(&self) -> &dyn StarRepository {
		self.stars.as_ref()
	}
}
