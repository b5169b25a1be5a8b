use crate::api::{changes_or_default, ApiJson};
use crate::error::{parse_id, ApiError, ErrorBody};
use crate::models::*;
use crate::AppState;
use axum::{
	extract::{rejection::JsonRejection, *},
	http::StatusCode,
};
use std::collections::HashMap;

/// Create a new comment
///
/// `postId` is stored as given, whether or not the post exists.
#[utoipa::path(
	post,
	path = "/api/comment",
	operation_id = "create_comment",
	tag = "Comments",
	request_body = CommentRequest,
	responses(
		(status = 201, description = "The comment was successfully created", body = Message),
		(status = 422, description = "The comment could not be created", body = ErrorBody),
	)
)]
pub async fn create(
	State(state): State<AppState>,
	ApiJson(comment): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
	let comment = comment.validate()?;
	let comment = state.db.create_comment(&comment).await?;
	tracing::debug!(id = %comment.id, post_id = %comment.post_id, "created comment");

	Ok((
		StatusCode::CREATED,
		Json(Message::new("Comment Created Successfully")),
	))
}

/// Get all comments, each with its post resolved
#[utoipa::path(
	get,
	path = "/api/comment/all",
	operation_id = "list_comments",
	tag = "Comments",
	responses(
		(status = 200, description = "A list of comments", body = [CommentWithPost]),
		(status = 422, description = "The comments could not be loaded", body = ErrorBody),
	)
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CommentWithPost>>, ApiError> {
	let comments = state.db.list_comments().await?;

	let mut post_ids = comments
		.iter()
		.map(|comment| comment.post_id)
		.collect::<Vec<_>>();
	post_ids.sort_unstable();
	post_ids.dedup();

	let posts = state
		.db
		.get_posts(&post_ids)
		.await?
		.into_iter()
		.map(|post| (post.id, post))
		.collect::<HashMap<_, _>>();

	let comments = comments
		.into_iter()
		.map(|comment| {
			let post = posts.get(&comment.post_id).cloned();
			comment.with_post(post)
		})
		.collect();

	Ok(Json(comments))
}

/// Get comment by id
///
/// Responds with `null` when no comment has the given id.
#[utoipa::path(
	get,
	path = "/api/comment/{id}",
	operation_id = "get_comment",
	tag = "Comments",
	params(("id" = String, Path, description = "The comment id")),
	responses(
		(status = 200, description = "The comment, or null", body = Comment),
		(status = 422, description = "The id is malformed", body = ErrorBody),
	)
)]
pub async fn get_comment(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Option<Comment>>, ApiError> {
	let id = parse_id(&id)?;
	Ok(Json(state.db.get_comment(id).await?))
}

/// Update comment by id
#[utoipa::path(
	put,
	path = "/api/comment/{id}",
	operation_id = "update_comment",
	tag = "Comments",
	params(("id" = String, Path, description = "The comment id")),
	request_body = CommentUpdate,
	responses(
		(status = 200, description = "The comment was updated", body = String),
		(status = 422, description = "The comment was not found", body = ErrorBody),
	)
)]
pub async fn update(
	Path(id): Path<String>,
	State(state): State<AppState>,
	body: Result<Json<CommentUpdate>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
	let id = parse_id(&id)?;
	let changes = changes_or_default(body)?;
	let Some(old) = state.db.get_comment(id).await? else {
		return Err(ApiError::NotFound("comment", id));
	};

	let content = changes.merge(&old);
	state.db.update_comment(id, &content).await?;

	Ok(Json("Comment Updated Successfully"))
}

/// Remove the comment by id
#[utoipa::path(
	delete,
	path = "/api/comment/{id}",
	operation_id = "delete_comment",
	tag = "Comments",
	params(("id" = String, Path, description = "The comment id")),
	responses(
		(status = 200, description = "The comment was deleted", body = String),
		(status = 422, description = "The id is malformed", body = ErrorBody),
	)
)]
pub async fn delete_comment(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<&'static str>, ApiError> {
	let id = parse_id(&id)?;
	state.db.delete_comment(id).await?;
	Ok(Json("Comment Deleted Successfully"))
}
