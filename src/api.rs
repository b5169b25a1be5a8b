pub mod comments;
pub mod posts;

use crate::error::ApiError;
use crate::AppState;
use axum::{
	extract::{rejection::JsonRejection, FromRequest},
	routing::*,
	Json, Router,
};

/// `Json` whose rejections are reported like every other handler failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Update bodies: a request without a JSON content type (or without a body)
/// supplies no fields. A JSON body that fails to parse is still rejected.
pub fn changes_or_default<T: Default>(
	body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
	match body {
		Ok(Json(changes)) => Ok(changes),
		Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
		Err(rejection) => Err(rejection.into()),
	}
}

pub fn route(state: AppState) -> Router {
	Router::new()
		.route("/api/post", post(posts::create))
		.route("/api/post/all", get(posts::list))
		.route(
			"/api/post/:id",
			get(posts::get_post)
				.put(posts::update)
				.delete(posts::delete_post),
		)
		.route("/api/comment", post(comments::create))
		.route("/api/comment/all", get(comments::list))
		.route(
			"/api/comment/:id",
			get(comments::get_comment)
				.put(comments::update)
				.delete(comments::delete_comment),
		)
		.with_state(state)
}

#[cfg(test)]
mod tests {
	use crate::config::Config;
	use crate::store::MemoryStore;
	use crate::AppState;
	use axum::{
		body::Body,
		http::{header, Method, Request, StatusCode},
		Router,
	};
	use http_body_util::BodyExt;
	use serde_json::{json, Value};
	use std::sync::Arc;
	use time::{format_description::well_known::Rfc3339, OffsetDateTime};
	use tower::ServiceExt;

	fn app() -> Router {
		let state = AppState {
			config: Config::default(),
			db: Arc::new(MemoryStore::new()),
		};
		crate::app(state)
	}

	async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
		let request = Request::builder().method(method).uri(uri);
		let request = match body {
			Some(body) => request
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(body.to_string())),
			None => request.body(Body::empty()),
		}
		.unwrap();

		let response = app.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = response.into_body().collect().await.unwrap().to_bytes();
		let value = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap()
		};
		(status, value)
	}

	async fn create_post(app: &Router, title: &str, content: &str) -> Value {
		let (status, _) = send(
			app,
			Method::POST,
			"/api/post",
			Some(json!({ "title": title, "content": content })),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);

		let (_, posts) = send(app, Method::GET, "/api/post/all", None).await;
		posts
			.as_array()
			.unwrap()
			.iter()
			.rev()
			.find(|post| post["title"] == title)
			.cloned()
			.unwrap()
	}

	#[tokio::test]
	async fn post_lifecycle() {
		let app = app();
		let before = OffsetDateTime::now_utc();

		let (status, body) = send(
			&app,
			Method::POST,
			"/api/post",
			Some(json!({ "title": "A", "content": "B" })),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(body, json!({ "message": "post created successfully" }));

		let (_, posts) = send(&app, Method::GET, "/api/post/all", None).await;
		let id = posts[0]["id"].as_str().unwrap().to_string();
		let uri = format!("/api/post/{id}");

		let (status, post) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(post["title"], "A");
		assert_eq!(post["content"], "B");
		let created_at =
			OffsetDateTime::parse(post["createdAt"].as_str().unwrap(), &Rfc3339).unwrap();
		assert!(created_at >= before && created_at <= OffsetDateTime::now_utc());

		let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "title": "C" }))).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!("post updated successfully"));

		let (_, post) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(post["title"], "C");
		assert_eq!(post["content"], "B");

		let (status, body) = send(&app, Method::DELETE, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!("Post Deleted Successfully"));

		let (status, post) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(post, Value::Null);
	}

	#[tokio::test]
	async fn create_post_requires_title_and_content() {
		let app = app();

		let (status, body) = send(&app, Method::POST, "/api/post", Some(json!({ "content": "B" }))).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["name"], "ValidationError");

		let (status, _) = send(
			&app,
			Method::POST,
			"/api/post",
			Some(json!({ "title": "A", "content": "" })),
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

		let (_, posts) = send(&app, Method::GET, "/api/post/all", None).await;
		assert_eq!(posts, json!([]));
	}

	#[tokio::test]
	async fn malformed_body_is_unprocessable() {
		let app = app();
		let request = Request::builder()
			.method(Method::POST)
			.uri("/api/post")
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from("{not json"))
			.unwrap();

		let response = app.oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	}

	#[tokio::test]
	async fn empty_update_leaves_post_unchanged() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		let uri = format!("/api/post/{}", post["id"].as_str().unwrap());

		let (status, _) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
		assert_eq!(status, StatusCode::OK);

		let (_, after) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(after, post);
	}

	#[tokio::test]
	async fn update_without_body_leaves_post_unchanged() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		let uri = format!("/api/post/{}", post["id"].as_str().unwrap());

		let (status, body) = send(&app, Method::PUT, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!("post updated successfully"));

		let (_, after) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(after, post);
	}

	#[tokio::test]
	async fn update_with_malformed_json_fails() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		let uri = format!("/api/post/{}", post["id"].as_str().unwrap());

		let request = Request::builder()
			.method(Method::PUT)
			.uri(&uri)
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from("{not json"))
			.unwrap();
		let response = app.clone().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

		let (_, after) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(after, post);
	}

	#[tokio::test]
	async fn update_changes_only_supplied_field() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		let uri = format!("/api/post/{}", post["id"].as_str().unwrap());

		send(&app, Method::PUT, &uri, Some(json!({ "content": "D" }))).await;

		let (_, after) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(after["title"], "A");
		assert_eq!(after["content"], "D");
		assert_eq!(after["createdAt"], post["createdAt"]);
	}

	#[tokio::test]
	async fn update_of_missing_post_fails() {
		let app = app();
		let uri = format!("/api/post/{}", uuid::Uuid::new_v4());

		let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "title": "C" }))).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["name"], "NotFoundError");
	}

	#[tokio::test]
	async fn delete_of_missing_post_keeps_others() {
		let app = app();
		let kept = create_post(&app, "A", "B").await;

		let uri = format!("/api/post/{}", uuid::Uuid::new_v4());
		let (status, _) = send(&app, Method::DELETE, &uri, None).await;
		assert_eq!(status, StatusCode::OK);

		let (_, posts) = send(&app, Method::GET, "/api/post/all", None).await;
		assert_eq!(posts, json!([kept]));
	}

	#[tokio::test]
	async fn malformed_id_is_a_cast_error() {
		let app = app();

		let (status, body) = send(&app, Method::GET, "/api/post/not-an-id", None).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["name"], "CastError");

		let (status, _) = send(&app, Method::DELETE, "/api/comment/not-an-id", None).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	}

	#[tokio::test]
	async fn comment_listing_resolves_posts() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		let orphan = uuid::Uuid::new_v4();

		let (status, body) = send(
			&app,
			Method::POST,
			"/api/comment",
			Some(json!({ "content": "first", "postId": post["id"] })),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(body, json!({ "message": "Comment Created Successfully" }));

		let (status, _) = send(
			&app,
			Method::POST,
			"/api/comment",
			Some(json!({ "content": "second", "postId": orphan })),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);

		let (status, comments) = send(&app, Method::GET, "/api/comment/all", None).await;
		assert_eq!(status, StatusCode::OK);
		let comments = comments.as_array().unwrap();
		assert_eq!(comments.len(), 2);

		let first = comments.iter().find(|c| c["content"] == "first").unwrap();
		assert_eq!(first["postId"], post);

		let second = comments.iter().find(|c| c["content"] == "second").unwrap();
		assert_eq!(second["postId"], Value::Null);
	}

	#[tokio::test]
	async fn comment_requires_content_and_post_id() {
		let app = app();

		let (status, _) = send(&app, Method::POST, "/api/comment", Some(json!({ "content": "hi" }))).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

		let (status, _) = send(
			&app,
			Method::POST,
			"/api/comment",
			Some(json!({ "postId": uuid::Uuid::new_v4() })),
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

		let (_, comments) = send(&app, Method::GET, "/api/comment/all", None).await;
		assert_eq!(comments, json!([]));
	}

	#[tokio::test]
	async fn comment_update_and_delete() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		send(
			&app,
			Method::POST,
			"/api/comment",
			Some(json!({ "content": "before", "postId": post["id"] })),
		)
		.await;

		let (_, comments) = send(&app, Method::GET, "/api/comment/all", None).await;
		let uri = format!("/api/comment/{}", comments[0]["id"].as_str().unwrap());

		let (status, body) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!("Comment Updated Successfully"));
		let (_, comment) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(comment["content"], "before");

		send(&app, Method::PUT, &uri, Some(json!({ "content": "after" }))).await;
		let (_, comment) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(comment["content"], "after");
		assert_eq!(comment["postId"], post["id"]);

		let (status, body) = send(&app, Method::DELETE, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!("Comment Deleted Successfully"));
		let (_, comment) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(comment, Value::Null);
	}

	#[tokio::test]
	async fn comment_update_ignores_post_id_and_missing_body() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		send(
			&app,
			Method::POST,
			"/api/comment",
			Some(json!({ "content": "before", "postId": post["id"] })),
		)
		.await;
		let (_, comments) = send(&app, Method::GET, "/api/comment/all", None).await;
		let uri = format!("/api/comment/{}", comments[0]["id"].as_str().unwrap());

		let (status, _) = send(&app, Method::PUT, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		let (_, comment) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(comment["content"], "before");

		let (status, _) = send(
			&app,
			Method::PUT,
			&uri,
			Some(json!({ "content": "after", "postId": "not-a-uuid" })),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		let (_, comment) = send(&app, Method::GET, &uri, None).await;
		assert_eq!(comment["content"], "after");
		assert_eq!(comment["postId"], post["id"]);
	}

	#[tokio::test]
	async fn missing_comment_update_fails_and_delete_succeeds() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		send(
			&app,
			Method::POST,
			"/api/comment",
			Some(json!({ "content": "kept", "postId": post["id"] })),
		)
		.await;
		let uri = format!("/api/comment/{}", uuid::Uuid::new_v4());

		let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "content": "x" }))).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["name"], "NotFoundError");

		let (status, body) = send(&app, Method::DELETE, &uri, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!("Comment Deleted Successfully"));

		let (_, comments) = send(&app, Method::GET, "/api/comment/all", None).await;
		assert_eq!(comments.as_array().unwrap().len(), 1);
		assert_eq!(comments[0]["content"], "kept");
	}

	#[tokio::test]
	async fn deleting_a_post_leaves_its_comments() {
		let app = app();
		let post = create_post(&app, "A", "B").await;
		send(
			&app,
			Method::POST,
			"/api/comment",
			Some(json!({ "content": "left behind", "postId": post["id"] })),
		)
		.await;

		let uri = format!("/api/post/{}", post["id"].as_str().unwrap());
		send(&app, Method::DELETE, &uri, None).await;

		let (_, comments) = send(&app, Method::GET, "/api/comment/all", None).await;
		assert_eq!(comments.as_array().unwrap().len(), 1);
		assert_eq!(comments[0]["postId"], Value::Null);
	}

	#[tokio::test]
	async fn cross_origin_requests_are_allowed() {
		let app = app();
		let request = Request::builder()
			.uri("/api/post/all")
			.header(header::ORIGIN, "https://elsewhere.example")
			.body(Body::empty())
			.unwrap();

		let response = app.oneshot(request).await.unwrap();
		assert_eq!(
			response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
			"*"
		);
	}

	#[tokio::test]
	async fn static_files_are_served_at_root() {
		let app = app();
		let request = Request::builder().uri("/").body(Body::empty()).unwrap();

		let response = app.oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let bytes = response.into_body().collect().await.unwrap().to_bytes();
		assert!(String::from_utf8_lossy(&bytes).contains("<title>Blog</title>"));
	}
}
