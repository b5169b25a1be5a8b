use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, ToSchema, sqlx::FromRow, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// Auto generated id
	pub id: Uuid,
	pub title: String,
	pub content: String,
	/// Post creation time
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, ToSchema, sqlx::FromRow, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	/// Auto generated id
	pub id: Uuid,
	pub content: String,
	/// Comment creation time
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// The post that has the comment
	pub post_id: Uuid,
}

/// A comment as returned by the listing, with its post resolved in place of the id.
/// `postId` is null when the referenced post no longer exists.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithPost {
	pub id: Uuid,
	pub content: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	pub post_id: Option<Post>,
}

impl Comment {
	pub fn with_post(self, post: Option<Post>) -> CommentWithPost {
		CommentWithPost {
			id: self.id,
			content: self.content,
			created_at: self.created_at,
			post_id: post,
		}
	}
}

/// Body of `POST /api/post` and `PUT /api/post/:id`.
#[derive(Serialize, Deserialize, ToSchema, Default, Debug)]
pub struct PostRequest {
	pub title: Option<String>,
	pub content: Option<String>,
}

/// A post that passed the presence checks and is ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPost {
	pub title: String,
	pub content: String,
}

impl PostRequest {
	pub fn validate(self) -> Result<NewPost, ApiError> {
		Ok(NewPost {
			title: required("title", self.title)?,
			content: required("content", self.content)?,
		})
	}

	/// Omitted or empty fields keep the value stored in `old`.
	pub fn merge(self, old: &Post) -> NewPost {
		NewPost {
			title: present(self.title).unwrap_or_else(|| old.title.clone()),
			content: present(self.content).unwrap_or_else(|| old.content.clone()),
		}
	}
}

/// Body of `POST /api/comment`.
#[derive(Serialize, Deserialize, ToSchema, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
	pub content: Option<String>,
	pub post_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewComment {
	pub content: String,
	pub post_id: Uuid,
}

impl CommentRequest {
	pub fn validate(self) -> Result<NewComment, ApiError> {
		let content = required("content", self.content)?;
		let Some(post_id) = self.post_id else {
			return Err(ApiError::Validation(String::from("Path `postId` is required.")));
		};
		Ok(NewComment { content, post_id })
	}
}

/// Body of `PUT /api/comment/:id`. Only the content can change; any other field is ignored.
#[derive(Serialize, Deserialize, ToSchema, Default, Debug)]
pub struct CommentUpdate {
	pub content: Option<String>,
}

impl CommentUpdate {
	pub fn merge(self, old: &Comment) -> String {
		present(self.content).unwrap_or_else(|| old.content.clone())
	}
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct Message {
	pub message: String,
}

impl Message {
	pub fn new(message: &str) -> Self {
		Self {
			message: String::from(message),
		}
	}
}

fn present(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
	present(value).ok_or_else(|| ApiError::Validation(format!("Path `{field}` is required.")))
}
