use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use discussions_core::id::{CommentId, TopicId};
use serde::Serialize;
use std::borrow::Cow;
use utoipa::ToSchema;

/// A single topic or comment, sent back with the status it was produced with.
#[derive(Debug, Serialize)]
pub struct DiscussionResponse<T> {
    #[serde(skip)]
    status_code: StatusCode,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> DiscussionResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            body,
        }
    }

    pub fn created(body: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for DiscussionResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

pub type ErrorMessageType = Cow<'static, str>;

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscussionError {
    #[serde(skip)]
    status_code: StatusCode,
    message: Cow<'static, str>,
}

impl DiscussionError {
    pub fn topic_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "the requested topic does not exist")
    }

    pub fn comment_not_found(topic_id: &TopicId, comment_id: &CommentId) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("comment {comment_id} not found in topic {topic_id}"),
        )
    }

    pub fn unprocessable_entity(message: impl Into<ErrorMessageType>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn new(status_code: StatusCode, message: impl Into<ErrorMessageType>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for DiscussionError {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
