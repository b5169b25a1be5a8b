use crate::models::*;
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Document store holding the `posts` and `comments` collections.
///
/// Updates and deletes address a single document by id and succeed when nothing
/// matches. Listing order is whatever the backend returns.
#[async_trait]
pub trait Store: Send + Sync {
	async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError>;
	async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
	async fn get_post(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
	/// Posts matching any of `ids`, in no particular order. Unknown ids are skipped.
	async fn get_posts(&self, ids: &[Uuid]) -> Result<Vec<Post>, StoreError>;
	async fn update_post(&self, id: Uuid, post: &NewPost) -> Result<(), StoreError>;
	async fn delete_post(&self, id: Uuid) -> Result<(), StoreError>;

	async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StoreError>;
	async fn list_comments(&self) -> Result<Vec<Comment>, StoreError>;
	async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError>;
	async fn update_comment(&self, id: Uuid, content: &str) -> Result<(), StoreError>;
	async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError>;

	/// Release pooled connections. Called once on shutdown.
	async fn close(&self) {}
}

/// In-process store used when no database is configured, and by the tests.
#[derive(Default)]
pub struct MemoryStore {
	posts: RwLock<Vec<Post>>,
	comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl Store for MemoryStore {
	async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
		let post = Post {
			id: Uuid::new_v4(),
			title: post.title.clone(),
			content: post.content.clone(),
			created_at: OffsetDateTime::now_utc(),
		};
		self.posts
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.push(post.clone());
		Ok(post)
	}

	async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
		Ok(self
			.posts
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone())
	}

	async fn get_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
		let posts = self.posts.read().unwrap_or_else(PoisonError::into_inner);
		Ok(posts.iter().find(|post| post.id == id).cloned())
	}

	async fn get_posts(&self, ids: &[Uuid]) -> Result<Vec<Post>, StoreError> {
		let posts = self.posts.read().unwrap_or_else(PoisonError::into_inner);
		Ok(posts
			.iter()
			.filter(|post| ids.contains(&post.id))
			.cloned()
			.collect())
	}

	async fn update_post(&self, id: Uuid, post: &NewPost) -> Result<(), StoreError> {
		let mut posts = self.posts.write().unwrap_or_else(PoisonError::into_inner);
		if let Some(stored) = posts.iter_mut().find(|stored| stored.id == id) {
			stored.title = post.title.clone();
			stored.content = post.content.clone();
		}
		Ok(())
	}

	async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
		self.posts
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.retain(|post| post.id != id);
		Ok(())
	}

	async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
		let comment = Comment {
			id: Uuid::new_v4(),
			content: comment.content.clone(),
			created_at: OffsetDateTime::now_utc(),
			post_id: comment.post_id,
		};
		self.comments
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.push(comment.clone());
		Ok(comment)
	}

	async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
		Ok(self
			.comments
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone())
	}

	async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
		let comments = self.comments.read().unwrap_or_else(PoisonError::into_inner);
		Ok(comments.iter().find(|comment| comment.id == id).cloned())
	}

	async fn update_comment(&self, id: Uuid, content: &str) -> Result<(), StoreError> {
		let mut comments = self.comments.write().unwrap_or_else(PoisonError::into_inner);
		if let Some(stored) = comments.iter_mut().find(|stored| stored.id == id) {
			stored.content = String::from(content);
		}
		Ok(())
	}

	async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError> {
		self.comments
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.retain(|comment| comment.id != id);
		Ok(())
	}
}
