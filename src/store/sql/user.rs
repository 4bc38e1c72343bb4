use async_trait::async_trait;

use super::violated_constraint;
use crate::{
	model,
	store::{self, Error, Result},
	Database,
};

const EMAIL_CONSTRAINT: &str = "users_email_key";

pub struct UserRepository {
	database: Database,
}

impl UserRepository {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

#[async_trait]
impl store::UserRepository for UserRepository {
	async fn create(&self, user: model::NewUser) -> Result<model::User> {
		let id = sqlx::query_scalar::<_, i64>(
			r#"
				INSERT INTO users (email, encrypted_password, username)
				VALUES ($1, $2, $3)
				RETURNING id
			"#,
		)
		.bind(&user.email)
		.bind(&user.encrypted_password)
		.bind(&user.username)
		.fetch_one(&self.database)
		.await
		.map_err(|e| {
			if violated_constraint(&e) == Some(EMAIL_CONSTRAINT) {
				Error::EmailTaken
			} else {
				Error::Database(e)
			}
		})?;

		Ok(model::User {
			id,
			email: user.email,
			username: user.username,
			encrypted_password: user.encrypted_password,
		})
	}

	async fn find(&self, id: i64) -> Result<model::User> {
		sqlx::query_as::<_, model::User>(
			r#"
				SELECT id, email, username, encrypted_password FROM users
				WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.database)
		.await?
		.ok_or(Error::RecordNotFound)
	}

	async fn find_by_email(&self, email: &str) -> Result<model::User> {
		sqlx::query_as::<_, model::User>(
			r#"
				SELECT id, email, username, encrypted_password FROM users
				WHERE email = $1
			"#,
		)
		.bind(email)
		.fetch_optional(&self.database)
		.await?
		.ok_or(Error::RecordNotFound)
	}
}
