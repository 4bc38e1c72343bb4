use serde::{Deserialize, Serialize};
use validator::Validate;

/// A model representing a single user.
///
/// Use this when fetching from the database and returning to the client.
/// The encrypted password is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub email: String,
	pub username: String,
	/// argon2 hash in PHC string format
	#[serde(skip)]
	pub encrypted_password: String,
}

/// The public view of a user, embedded in posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
	pub id: i64,
	pub username: String,
}

impl From<&User> for Author {
	fn from(user: &User) -> Self {
		Self {
			id: user.id,
			username: user.username.clone(),
		}
	}
}

/// A user ready to be inserted, with the password already hashed.
#[derive(Debug)]
pub struct NewUser {
	pub email: String,
	pub username: String,
	pub encrypted_password: String,
}

/// A single post, created by a user.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
	pub id: i64,
	pub author: Author,
	pub header: String,
	pub text_post: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub stars_count: i64,
	/// Only known when the request carries a session.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_starred: Option<bool>,
}

/// The star state of a post as seen by the user who (un)starred it.
#[derive(Debug, Serialize)]
pub struct Star {
	pub starer: User,
	pub post: StarredPost,
}

#[derive(Debug, Serialize)]
pub struct StarredPost {
	pub id: i64,
	pub stars_count: i64,
	pub is_starred: bool,
}

/// Wraps a response body in `{"items": ...}`.
#[derive(Debug, Serialize)]
pub struct Items<T> {
	pub items: T,
}

#[derive(Debug, Serialize)]
pub struct Profile {
	pub user: Author,
}

#[derive(Deserialize, Validate)]
pub struct SignupInput {
	#[validate(email(message = "must be a valid email address"))]
	pub email: String,
	#[validate(length(min = 6, max = 100, message = "the length must be between 6 and 100"))]
	pub password: String,
	#[validate(length(min = 3, max = 32, message = "the length must be between 3 and 32"))]
	pub username: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginInput {
	pub email: String,
	pub password: String,
	/// Keeps the session cookie across browser restarts.
	#[serde(default, rename = "rememberMe")]
	pub remember_me: bool,
}

/// The writable fields of a post, used for both creating and updating.
#[derive(Debug, Deserialize, Validate)]
pub struct PostInput {
	#[validate(length(min = 16, max = 256, message = "the length must be between 16 and 256"))]
	pub header: String,
	#[validate(length(
		min = 100,
		max = 20000,
		message = "the length must be between 100 and 20000"
	))]
	pub text_post: String,
}

#[derive(Deserialize, Validate)]
pub struct IdInput {
	#[validate(range(min = 1, message = "must be a positive integer"))]
	pub id: i64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 1_000_000))]
	pub page: Option<i64>,
	/// The number of items to return per page. Everything is returned when absent.
	#[validate(range(min = 1, max = 100))]
	pub size: Option<i64>,
}

impl Paginate {
	pub fn offset(&self) -> i64 {
		match self.size {
			Some(size) => (self.page.unwrap_or(1) - 1) * size,
			None => 0,
		}
	}

	pub fn limit(&self) -> Option<i64> {
		self.size
	}
}
