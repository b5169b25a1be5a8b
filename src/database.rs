use crate::models::*;
use crate::store::{Store, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

/// PostgreSQL-backed store. One pool is created at start-up and shared by every request.
#[derive(Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
		let pool = PgPoolOptions::new()
			.max_connections(max_connections)
			.connect(database_url)
			.await?;
		sqlx::migrate!().run(&pool).await?;
		Ok(Self { pool })
	}
}

#[async_trait]
impl Store for PgStore {
	async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
		let post = sqlx::query_as::<_, Post>(
			"INSERT INTO posts (title, content) VALUES ($1, $2) RETURNING id, title, content, created_at",
		)
		.bind(&post.title)
		.bind(&post.content)
		.fetch_one(&self.pool)
		.await?;
		Ok(post)
	}

	async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
		let posts = sqlx::query_as::<_, Post>("SELECT id, title, content, created_at FROM posts")
			.fetch_all(&self.pool)
			.await?;
		Ok(posts)
	}

	async fn get_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
		let post = sqlx::query_as::<_, Post>(
			"SELECT id, title, content, created_at FROM posts WHERE id = $1",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(post)
	}

	async fn get_posts(&self, ids: &[Uuid]) -> Result<Vec<Post>, StoreError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		let posts = sqlx::query_as::<_, Post>(
			"SELECT id, title, content, created_at FROM posts WHERE id = ANY($1)",
		)
		.bind(ids)
		.fetch_all(&self.pool)
		.await?;
		Ok(posts)
	}

	async fn update_post(&self, id: Uuid, post: &NewPost) -> Result<(), StoreError> {
		sqlx::query("UPDATE posts SET title = $2, content = $3 WHERE id = $1")
			.bind(id)
			.bind(&post.title)
			.bind(&post.content)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
		sqlx::query("DELETE FROM posts WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
		let comment = sqlx::query_as::<_, Comment>(
			"INSERT INTO comments (content, post_id) VALUES ($1, $2) RETURNING id, content, created_at, post_id",
		)
		.bind(&comment.content)
		.bind(comment.post_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(comment)
	}

	async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
		let comments =
			sqlx::query_as::<_, Comment>("SELECT id, content, created_at, post_id FROM comments")
				.fetch_all(&self.pool)
				.await?;
		Ok(comments)
	}

	async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
		let comment = sqlx::query_as::<_, Comment>(
			"SELECT id, content, created_at, post_id FROM comments WHERE id = $1",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(comment)
	}

	async fn update_comment(&self, id: Uuid, content: &str) -> Result<(), StoreError> {
		sqlx::query("UPDATE comments SET content = $2 WHERE id = $1")
			.bind(id)
			.bind(content)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError> {
		sqlx::query("DELETE FROM comments WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	async fn close(&self) {
		self.pool.close().await;
	}
}
