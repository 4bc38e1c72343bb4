//! Postgres-backed repositories.

mod post;
mod star;
mod user;

use std::sync::Arc;

pub use post::PostRepository;
pub use star::StarRepository;
pub use user::UserRepository;

use crate::Database;

/// Builds a [`super::Store`] where every repository shares `database`.
pub fn store(database: Database) -> super::Store {
	super::Store::new(
		Arc::new(UserRepository::new(database.clone())),
		Arc::new(PostRepository::new(database.clone())),
		Arc::new(StarRepository::new(database)),
	)
}

/// Returns the name of the constraint a query violated, if any.
fn violated_constraint(error: &sqlx::Error) -> Option<&str> {
	match error {
		sqlx::Error::Database(error) => error.constraint(),
		_ => None,
	}
}
