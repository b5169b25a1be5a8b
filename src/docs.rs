use crate::api::{comments, posts};
use crate::error::ErrorBody;
use crate::models::*;
use utoipa::openapi::server::Server;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const UI_PATH: &str = "/api-docs";
pub const SPEC_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
	info(
		title = "Blog",
		version = "1.0.0",
		description = "simple blog (user, post, comment)"
	),
	paths(
		posts::create,
		posts::list,
		posts::get_post,
		posts::update,
		posts::delete_post,
		comments::create,
		comments::list,
		comments::get_comment,
		comments::update,
		comments::delete_comment,
	),
	components(schemas(
		Post,
		Comment,
		CommentWithPost,
		PostRequest,
		CommentRequest,
		CommentUpdate,
		Message,
		ErrorBody
	)),
	tags(
		(name = "Posts", description = "the posts APIs"),
		(name = "Comments", description = "the comments APIs"),
	)
)]
pub struct ApiDoc;

/// The generated document, advertising `base_url` as its only server.
pub fn openapi(base_url: &str) -> utoipa::openapi::OpenApi {
	let mut doc = ApiDoc::openapi();
	doc.servers = Some(vec![Server::new(base_url)]);
	doc
}

pub fn route(base_url: &str) -> SwaggerUi {
	SwaggerUi::new(UI_PATH).url(SPEC_PATH, openapi(base_url))
}
