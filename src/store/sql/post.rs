use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
	model,
	store::{self, Error, Result},
	Database,
};

/// Expands to the post query with its author, star count and the viewer's
/// star, followed by `tail`. The viewer is always bound as `$1`.
macro_rules! select_posts {
	($tail:literal) => {
		concat!(
			r#"
				SELECT
					posts.id, posts.header, posts.text_post, posts.created_at,
					users.id AS author_id, users.username AS author_username,
					(SELECT COUNT(*) FROM stars WHERE stars.post_id = posts.id) AS stars_count,
					CASE WHEN $1::BIGINT IS NULL THEN NULL ELSE EXISTS (
						SELECT 1 FROM stars WHERE stars.post_id = posts.id AND stars.liker_id = $1
					) END AS is_starred
				FROM posts
				INNER JOIN users ON posts.author_id = users.id
			"#,
			$tail
		)
	};
}

#[derive(sqlx::FromRow)]
struct PostRow {
	id: i64,
	header: String,
	text_post: String,
	created_at: DateTime<Utc>,
	author_id: i64,
	author_username: String,
	stars_count: i64,
	is_starred: Option<bool>,
}

impl From<PostRow> for model::Post {
	fn from(row: PostRow) -> Self {
		Self {
			id: row.id,
			author: model::Author {
				id: row.author_id,
				username: row.author_username,
			},
			header: row.header,
			text_post: row.text_post,
			created_at: row.created_at,
			stars_count: row.stars_count,
			is_starred: row.is_starred,
		}
	}
}

pub struct PostRepository {
	database: Database,
}

impl PostRepository {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

#[async_trait]
impl store::PostRepository for PostRepository {
	async fn create(&self, author: &model::User, input: &model::PostInput) -> Result<model::Post> {
		let (id, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
			r#"
				INSERT INTO posts (author_id, header, text_post)
				VALUES ($1, $2, $3)
				RETURNING id, created_at
			"#,
		)
		.bind(author.id)
		.bind(&input.header)
		.bind(&input.text_post)
		.fetch_one(&self.database)
		.await?;

		Ok(model::Post {
			id,
			author: author.into(),
			header: input.header.clone(),
			text_post: input.text_post.clone(),
			created_at,
			stars_count: 0,
			is_starred: Some(false),
		})
	}

	async fn find(&self, id: i64, viewer: Option<i64>) -> Result<model::Post> {
		sqlx::query_as::<_, PostRow>(select_posts!("WHERE posts.id = $2"))
			.bind(viewer)
			.bind(id)
			.fetch_optional(&self.database)
			.await?
			.map(Into::into)
			.ok_or(Error::RecordNotFound)
	}

	async fn find_all(
		&self,
		viewer: Option<i64>,
		paginate: &model::Paginate,
	) -> Result<Vec<model::Post>> {
		let posts = sqlx::query_as::<_, PostRow>(select_posts!(
			"ORDER BY posts.id DESC LIMIT $2 OFFSET $3"
		))
		.bind(viewer)
		.bind(paginate.limit())
		.bind(paginate.offset())
		.fetch_all(&self.database)
		.await?;

		Ok(posts.into_iter().map(Into::into).collect())
	}

	async fn find_by_author(
		&self,
		author: i64,
		viewer: Option<i64>,
		paginate: &model::Paginate,
	) -> Result<Vec<model::Post>> {
		let posts = sqlx::query_as::<_, PostRow>(select_posts!(
			"WHERE posts.author_id = $2 ORDER BY posts.id DESC LIMIT $3 OFFSET $4"
		))
		.bind(viewer)
		.bind(author)
		.bind(paginate.limit())
		.bind(paginate.offset())
		.fetch_all(&self.database)
		.await?;

		Ok(posts.into_iter().map(Into::into).collect())
	}

	async fn update(&self, id: i64, input: &model::PostInput) -> Result<()> {
		let status = sqlx::query(
			r#"
				UPDATE posts SET header = $1, text_post = $2
				WHERE id = $3
			"#,
		)
		.bind(&input.header)
		.bind(&input.text_post)
		.bind(id)
		.execute(&self.database)
		.await?;

		if status.rows_affected() == 0 {
			return Err(Error::RecordNotFound);
		}

		Ok(())
	}

	async fn delete(&self, id: i64) -> Result<()> {
		// stars are removed by the foreign key cascade
		let status = sqlx::query("DELETE FROM posts WHERE id = $1")
			.bind(id)
			.execute(&self.database)
			.await?;

		if status.rows_affected() == 0 {
			return Err(Error::RecordNotFound);
		}

		Ok(())
	}

	async fn is_starred_by_user(&self, user_id: i64, post_id: i64) -> Result<bool> {
		let starred = sqlx::query_scalar::<_, bool>(
			r#"
				SELECT EXISTS (
					SELECT 1 FROM stars WHERE liker_id = $1 AND post_id = $2
				)
			"#,
		)
		.bind(user_id)
		.bind(post_id)
		.fetch_one(&self.database)
		.await?;

		Ok(starred)
	}

	async fn stars_count(&self, post_id: i64) -> Result<i64> {
		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stars WHERE post_id = $1")
			.bind(post_id)
			.fetch_one(&self.database)
			.await?;

		Ok(count)
	}
}

#[cfg(test)]
mod test {
	use crate::{
		model,
		store::{sql, Error},
		Database,
	};

	async fn author(store: &crate::store::Store) -> model::User {
		store
			.user()
			.create(model::NewUser {
				email: "john@smith.com".into(),
				username: "john".into(),
				encrypted_password: "hash".into(),
			})
			.await
			.unwrap()
	}

	fn input(header: &str) -> model::PostInput {
		model::PostInput {
			header: header.into(),
			text_post: "t".repeat(100),
		}
	}

	#[sqlx::test]
	async fn test_find_reports_stars(pool: Database) {
		let store = sql::store(pool);
		let user = author(&store).await;

		let post = store
			.post()
			.create(&user, &input("a header of sixteen"))
			.await
			.unwrap();

		assert!(store.star().create(user.id, post.id).await.unwrap());
		assert!(!store.star().create(user.id, post.id).await.unwrap());

		let found = store.post().find(post.id, Some(user.id)).await.unwrap();

		assert_eq!(found.author.username, "john");
		assert_eq!(found.stars_count, 1);
		assert_eq!(found.is_starred, Some(true));

		let anonymous = store.post().find(post.id, None).await.unwrap();

		assert_eq!(anonymous.is_starred, None);
	}

	#[sqlx::test]
	async fn test_find_all_newest_first(pool: Database) {
		let store = sql::store(pool);
		let user = author(&store).await;

		let first = store
			.post()
			.create(&user, &input("the very first post"))
			.await
			.unwrap();
		let second = store
			.post()
			.create(&user, &input("the second post here"))
			.await
			.unwrap();

		let posts = store
			.post()
			.find_all(None, &model::Paginate::default())
			.await
			.unwrap();

		assert_eq!(
			posts.iter().map(|p| p.id).collect::<Vec<_>>(),
			vec![second.id, first.id]
		);

		let page = store
			.post()
			.find_by_author(
				user.id,
				None,
				&model::Paginate {
					page: Some(2),
					size: Some(1),
				},
			)
			.await
			.unwrap();

		assert_eq!(page.len(), 1);
		assert_eq!(page[0].id, first.id);
	}

	#[sqlx::test]
	async fn test_update_and_delete(pool: Database) {
		let store = sql::store(pool);
		let user = author(&store).await;

		let post = store
			.post()
			.create(&user, &input("a header of sixteen"))
			.await
			.unwrap();

		store
			.post()
			.update(post.id, &input("an updated header!"))
			.await
			.unwrap();

		assert_eq!(
			store.post().find(post.id, None).await.unwrap().header,
			"an updated header!"
		);

		store.star().create(user.id, post.id).await.unwrap();
		store.post().delete(post.id).await.unwrap();

		assert!(matches!(
			store.post().find(post.id, None).await,
			Err(Error::RecordNotFound)
		));
		assert!(matches!(
			store.post().delete(post.id).await,
			Err(Error::RecordNotFound)
		));
		assert_eq!(store.post().stars_count(post.id).await.unwrap(), 0);
	}
}
