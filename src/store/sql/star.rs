use async_trait::async_trait;

use super::violated_constraint;
use crate::{
	store::{self, Error, Result},
	Database,
};

const POST_CONSTRAINT: &str = "stars_post_id_fkey";

pub struct StarRepository {
	database: Database,
}

impl StarRepository {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

#[async_trait]
impl store::StarRepository for StarRepository {
	async fn create(&self, user_id: i64, post_id: i64) -> Result<bool> {
		// (liker_id, post_id) is unique, so concurrent stars collapse into one row
		let status = sqlx::query(
			r#"
				INSERT INTO stars (liker_id, post_id) VALUES ($1, $2)
				ON CONFLICT (liker_id, post_id) DO NOTHING
			"#,
		)
		.bind(user_id)
		.bind(post_id)
		.execute(&self.database)
		.await
		.map_err(|e| {
			if violated_constraint(&e) == Some(POST_CONSTRAINT) {
				Error::RecordNotFound
			} else {
				Error::Database(e)
			}
		})?;

		Ok(status.rows_affected() > 0)
	}

	async fn delete(&self, user_id: i64, post_id: i64) -> Result<bool> {
		let status = sqlx::query("DELETE FROM stars WHERE liker_id = $1 AND post_id = $2")
			.bind(user_id)
			.bind(post_id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}
