use crate::store::StoreError;
use axum::{
	extract::rejection::JsonRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Every handler failure. All variants are reported as 422 with an [`ErrorBody`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("{0}")]
	Validation(String),

	#[error("\"{0}\" is not a valid id")]
	InvalidId(String),

	#[error("no {0} with id {1}")]
	NotFound(&'static str, Uuid),

	#[error(transparent)]
	Store(#[from] StoreError),
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorBody {
	pub name: String,
	pub message: String,
}

impl ApiError {
	pub fn name(&self) -> &'static str {
		match self {
			ApiError::Validation(_) => "ValidationError",
			ApiError::InvalidId(_) => "CastError",
			ApiError::NotFound(..) => "NotFoundError",
			ApiError::Store(_) => "StoreError",
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::Validation(rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		tracing::warn!(error = %self, kind = self.name(), "request failed");
		let body = ErrorBody {
			name: String::from(self.name()),
			message: self.to_string(),
		};
		(StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
	}
}

pub fn parse_id(id: &str) -> Result<Uuid, ApiError> {
	Uuid::parse_str(id).map_err(|_| ApiError::InvalidId(String::from(id)))
}
