use axum::http::StatusCode;
use discussions_core::id::{CommentId, TopicId};
use engine::error::ErrorStatus;

/// Failures of the comment usecase.
///
/// The not-found and already-exists variants are preconditions the caller can fix;
/// `Repository` means the store itself failed.
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    #[error("topic {0} does not exist")]
    TopicNotFound(TopicId),
    #[error("comment {0} does not exist to reply")]
    CommentNotFoundToBeReplied(CommentId),
    #[error("comment {0} already exists")]
    CommentAlreadyExists(CommentId),
    #[error("comment service failed")]
    Repository,
}

impl ErrorStatus for CommentServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            CommentServiceError::TopicNotFound(_)
            | CommentServiceError::CommentNotFoundToBeReplied(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CommentServiceError::CommentAlreadyExists(_) => StatusCode::CONFLICT,
            CommentServiceError::Repository => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("topic service failed")]
pub struct TopicServiceError;

impl ErrorStatus for TopicServiceError {}

#[derive(Debug, thiserror::Error)]
#[error("failed to set up the metrics recorder")]
pub struct MetricsError;
