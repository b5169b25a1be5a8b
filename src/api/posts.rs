use crate::api::{changes_or_default, ApiJson};
use crate::error::{parse_id, ApiError, ErrorBody};
use crate::models::*;
use crate::AppState;
use axum::{
	extract::{rejection::JsonRejection, *},
	http::StatusCode,
};

/// Create a new post
#[utoipa::path(
	post,
	path = "/api/post",
	operation_id = "create_post",
	tag = "Posts",
	request_body = PostRequest,
	responses(
		(status = 201, description = "The post was created successfully", body = Message),
		(status = 422, description = "The post could not be created", body = ErrorBody),
	)
)]
pub async fn create(
	State(state): State<AppState>,
	ApiJson(post): ApiJson<PostRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
	let post = post.validate()?;
	let post = state.db.create_post(&post).await?;
	tracing::debug!(id = %post.id, "created post");

	Ok((
		StatusCode::CREATED,
		Json(Message::new("post created successfully")),
	))
}

/// Get all posts
#[utoipa::path(
	get,
	path = "/api/post/all",
	operation_id = "list_posts",
	tag = "Posts",
	responses(
		(status = 200, description = "All posts", body = [Post]),
		(status = 422, description = "The posts could not be loaded", body = ErrorBody),
	)
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
	Ok(Json(state.db.list_posts().await?))
}

/// Get post by id
///
/// Responds with `null` when no post has the given id.
#[utoipa::path(
	get,
	path = "/api/post/{id}",
	operation_id = "get_post",
	tag = "Posts",
	params(("id" = String, Path, description = "The post id")),
	responses(
		(status = 200, description = "The post, or null", body = Post),
		(status = 422, description = "The id is malformed", body = ErrorBody),
	)
)]
pub async fn get_post(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Option<Post>>, ApiError> {
	let id = parse_id(&id)?;
	Ok(Json(state.db.get_post(id).await?))
}

/// Update post by id
#[utoipa::path(
	put,
	path = "/api/post/{id}",
	operation_id = "update_post",
	tag = "Posts",
	params(("id" = String, Path, description = "The post id")),
	request_body = PostRequest,
	responses(
		(status = 200, description = "The post was updated successfully", body = String),
		(status = 422, description = "The post was not found", body = ErrorBody),
	)
)]
pub async fn update(
	Path(id): Path<String>,
	State(state): State<AppState>,
	body: Result<Json<PostRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
	let id = parse_id(&id)?;
	let changes = changes_or_default(body)?;
	let Some(old) = state.db.get_post(id).await? else {
		return Err(ApiError::NotFound("post", id));
	};

	let post = changes.merge(&old);
	state.db.update_post(id, &post).await?;

	Ok(Json("post updated successfully"))
}

/// Delete the post by id
///
/// Comments pointing at the post are left in place.
#[utoipa::path(
	delete,
	path = "/api/post/{id}",
	operation_id = "delete_post",
	tag = "Posts",
	params(("id" = String, Path, description = "The post id")),
	responses(
		(status = 200, description = "The post was deleted successfully", body = String),
		(status = 422, description = "The id is malformed", body = ErrorBody),
	)
)]
pub async fn delete_post(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<&'static str>, ApiError> {
	let id = parse_id(&id)?;
	state.db.delete_post(id).await?;
	Ok(Json("Post Deleted Successfully"))
}
