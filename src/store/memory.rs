//! In-memory repositories backing the HTTP tests.

use std::sync::{
	atomic::{AtomicI64, Ordering},
	Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};

use super::{Error, Result};
use crate::model;

struct PostRecord {
	author_id: i64,
	header: String,
	text_post: String,
	created_at: DateTime<Utc>,
}

/// Every repository at once, mirroring the constraints of the SQL schema.
#[derive(Default)]
pub struct Memory {
	users: DashMap<i64, model::User>,
	emails: DashMap<String, i64>,
	posts: DashMap<i64, PostRecord>,
	/// (liker, post)
	stars: DashMap<(i64, i64), ()>,
	next_id: AtomicI64,
}

/// Builds a [`super::Store`] backed by a fresh [`Memory`].
pub fn store() -> super::Store {
	let memory = Arc::new(Memory::default());

	super::Store::new(memory.clone(), memory.clone(), memory)
}

impl Memory {
	fn next_id(&self) -> i64 {
		self.next_id.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn count_stars(&self, post_id: i64) -> i64 {
		let count = self.stars.iter().filter(|star| star.key().1 == post_id).count();

		i64::try_from(count).unwrap_or(i64::MAX)
	}

	fn to_post(&self, id: i64, record: &PostRecord, viewer: Option<i64>) -> Result<model::Post> {
		let author = self
			.users
			.get(&record.author_id)
			.ok_or(Error::RecordNotFound)?;

		Ok(model::Post {
			id,
			author: author.value().into(),
			header: record.header.clone(),
			text_post: record.text_post.clone(),
			created_at: record.created_at,
			stars_count: self.count_stars(id),
			is_starred: viewer.map(|viewer| self.stars.contains_key(&(viewer, id))),
		})
	}

	fn collect_posts(
		&self,
		author: Option<i64>,
		viewer: Option<i64>,
		paginate: &model::Paginate,
	) -> Result<Vec<model::Post>> {
		let mut ids = self
			.posts
			.iter()
			.filter(|post| author.map_or(true, |author| post.author_id == author))
			.map(|post| *post.key())
			.collect::<Vec<_>>();

		ids.sort_unstable_by(|a, b| b.cmp(a));

		let skip = usize::try_from(paginate.offset()).unwrap_or(0);
		let take = paginate
			.limit()
			.and_then(|limit| usize::try_from(limit).ok())
			.unwrap_or(usize::MAX);

		ids.into_iter()
			.skip(skip)
			.take(take)
			.filter_map(|id| {
				let post = self.posts.get(&id)?;

				Some(self.to_post(id, post.value(), viewer))
			})
			.collect()
	}
}

#[async_trait]
impl super::UserRepository for Memory {
	async fn create(&self, user: model::NewUser) -> Result<model::User> {
		let id = match self.emails.entry(user.email.clone()) {
			Entry::Occupied(_) => return Err(Error::EmailTaken),
			Entry::Vacant(entry) => *entry.insert(self.next_id()),
		};

		let user = model::User {
			id,
			email: user.email,
			username: user.username,
			encrypted_password: user.encrypted_password,
		};

		self.users.insert(id, user.clone());

		Ok(user)
	}

	async fn find(&self, id: i64) -> Result<model::User> {
		self.users
			.get(&id)
			.map(|user| user.value().clone())
			.ok_or(Error::RecordNotFound)
	}

	async fn find_by_email(&self, email: &str) -> Result<model::User> {
		let id = *self.emails.get(email).ok_or(Error::RecordNotFound)?;

		super::UserRepository::find(self, id).await
	}
}

#[async_trait]
impl super::PostRepository for Memory {
	async fn create(&self, author: &model::User, input: &model::PostInput) -> Result<model::Post> {
		let id = self.next_id();
		let record = PostRecord {
			author_id: author.id,
			header: input.header.clone(),
			text_post: input.text_post.clone(),
			created_at: Utc::now(),
		};
		let post = self.to_post(id, &record, Some(author.id))?;

		self.posts.insert(id, record);

		Ok(post)
	}

	async fn find(&self, id: i64, viewer: Option<i64>) -> Result<model::Post> {
		let post = self.posts.get(&id).ok_or(Error::RecordNotFound)?;

		self.to_post(id, post.value(), viewer)
	}

	async fn find_all(
		&self,
		viewer: Option<i64>,
		paginate: &model::Paginate,
	) -> Result<Vec<model::Post>> {
		self.collect_posts(None, viewer, paginate)
	}

	async fn find_by_author(
		&self,
		author: i64,
		viewer: Option<i64>,
		paginate: &model::Paginate,
	) -> Result<Vec<model::Post>> {
		self.collect_posts(Some(author), viewer, paginate)
	}

	async fn update(&self, id: i64, input: &model::PostInput) -> Result<()> {
		let mut post = self.posts.get_mut(&id).ok_or(Error::RecordNotFound)?;

		post.header.clone_from(&input.header);
		post.text_post.clone_from(&input.text_post);

		Ok(())
	}

	async fn delete(&self, id: i64) -> Result<()> {
		self.posts.remove(&id).ok_or(Error::RecordNotFound)?;
		self.stars.retain(|&(_, post_id), _| post_id != id);

		Ok(())
	}

	async fn is_starred_by_user(&self, user_id: i64, post_id: i64) -> Result<bool> {
		Ok(self.stars.contains_key(&(user_id, post_id)))
	}

	async fn stars_count(&self, post_id: i64) -> Result<i64> {
		Ok(self.count_stars(post_id))
	}
}

#[async_trait]
impl super::StarRepository for Memory {
	async fn create(&self, user_id: i64, post_id: i64) -> Result<bool> {
		if !self.posts.contains_key(&post_id) {
			return Err(Error::RecordNotFound);
		}

		Ok(match self.stars.entry((user_id, post_id)) {
			Entry::Occupied(_) => false,
			Entry::Vacant(entry) => {
				entry.insert(());
				true
			}
		})
	}

	async fn delete(&self, user_id: i64, post_id: i64) -> Result<bool> {
		Ok(self.stars.remove(&(user_id, post_id)).is_some())
	}
}
