use super::requests::{CommentPatchRequest, CreateCommentRequest};
use super::responses::{DiscussionError, DiscussionResponse};
use crate::error::CommentServiceError;
use crate::metrics;
use crate::service::CommentUsecase;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use discussions_core::DiscussionEngine;
use discussions_core::id::{CommentId, TopicId};
use discussions_core::model::{Comment, CommentPatch};
use engine::Pagination;
use engine::error::EndpointError;
use engine::stream::StreamingResponse;
use tracing::instrument;

pub(super) const COMMENT_LIST_PATH: &str = "/{topic_id}/comments";
pub(super) const COMMENT_PATH: &str = "/{topic_id}/comments/{comment_id}";

const DEFAULT_COMMENT_PAGE_SIZE: u64 = 10;

/// List the comments of a topic. A topic that does not exist has no comments.
#[utoipa::path(
    get,
    path = COMMENT_LIST_PATH,
    responses(
        (status = OK, description = "The comments on the requested page, possibly none", body = Vec<Comment>),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic the comments belong to"),
        ("skip" = Option<u64>, Query, description = "How many comments to skip"),
        ("limit" = Option<u64>, Query, description = "The max number of comments to return"),
    )
)]
#[instrument(skip(usecase), err(Debug))]
pub async fn list_comments<E: DiscussionEngine>(
    State(usecase): State<CommentUsecase<E>>,
    Path(topic_id): Path<TopicId>,
    Query(pagination): Query<Pagination>,
) -> Result<Response, EndpointError<CommentServiceError>> {
    let comments = usecase
        .find_by_topic(
            &topic_id,
            pagination.skip,
            pagination.limit_or(DEFAULT_COMMENT_PAGE_SIZE),
        )
        .await?;

    metrics::increment_comments_retrieved_by(comments.len());
    Ok(StreamingResponse::ok(comments).into_response())
}

#[utoipa::path(
    get,
    path = COMMENT_PATH,
    responses(
        (status = OK, description = "The comment was found in the topic", body = Comment),
        (status = NOT_FOUND, description = "The topic has no comment with the given id", body = DiscussionError),
        (status = UNPROCESSABLE_ENTITY, description = "The topic does not exist", body = DiscussionError),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic the comment belongs to"),
        ("comment_id" = String, Path, description = "The comment to find"),
    )
)]
#[instrument(skip(usecase), err(Debug))]
pub async fn get_comment<E: DiscussionEngine>(
    State(usecase): State<CommentUsecase<E>>,
    Path((topic_id, comment_id)): Path<(TopicId, CommentId)>,
) -> Result<Response, EndpointError<CommentServiceError>> {
    let comment = usecase.get(&topic_id, &comment_id).await?;

    Ok(comment
        .map(|c| DiscussionResponse::ok(c).into_response())
        .unwrap_or_else(|| DiscussionError::comment_not_found(&topic_id, &comment_id).into_response()))
}

/// Add a comment to a topic, optionally as a reply to another comment in the same topic.
#[utoipa::path(
    post,
    path = COMMENT_LIST_PATH,
    responses(
        (status = CREATED, description = "The comment was stored", body = Comment),
        (status = UNPROCESSABLE_ENTITY, description = "The topic or the comment being replied to does not exist, or a required field was blank", body = DiscussionError),
        (status = CONFLICT, description = "A comment with the requested id already exists", body = DiscussionError),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic to comment on"),
    ),
    request_body = CreateCommentRequest
)]
#[instrument(skip(usecase, comment), err(Debug), fields(req.username = comment.username.as_str()))]
pub async fn create_comment<E: DiscussionEngine>(
    State(usecase): State<CommentUsecase<E>>,
    Path(topic_id): Path<TopicId>,
    Json(comment): Json<CreateCommentRequest>,
) -> Result<Response, EndpointError<CommentServiceError>> {
    if comment.content.trim().is_empty() {
        return Ok(DiscussionError::unprocessable_entity("content cannot be blank").into_response());
    }
    if comment.username.trim().is_empty() {
        return Ok(DiscussionError::unprocessable_entity("username cannot be blank").into_response());
    }

    let created = usecase.create(topic_id, comment.into()).await?;

    metrics::increment_comments_created();
    Ok(DiscussionResponse::created(created).into_response())
}

#[utoipa::path(
    put,
    path = COMMENT_PATH,
    responses(
        (status = OK, description = "The comment as stored after the update", body = Comment),
        (status = NOT_FOUND, description = "The topic has no comment with the given id", body = DiscussionError),
        (status = UNPROCESSABLE_ENTITY, description = "The topic does not exist, or the content was blank", body = DiscussionError),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic the comment belongs to"),
        ("comment_id" = String, Path, description = "The comment to update"),
    ),
    request_body = CommentPatchRequest
)]
#[instrument(skip(usecase), err(Debug))]
pub async fn update_comment<E: DiscussionEngine>(
    State(usecase): State<CommentUsecase<E>>,
    Path((topic_id, comment_id)): Path<(TopicId, CommentId)>,
    Json(patch): Json<CommentPatchRequest>,
) -> Result<Response, EndpointError<CommentServiceError>> {
    if patch.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Ok(DiscussionError::unprocessable_entity("content cannot be blank").into_response());
    }

    let patch = CommentPatch::new(patch.content);
    let writes = !patch.is_empty();
    let updated = usecase.update(&topic_id, &comment_id, patch).await?;

    let res = match updated {
        Some(comment) => {
            if writes {
                metrics::increment_comments_updated();
            }
            DiscussionResponse::ok(comment).into_response()
        }
        None => DiscussionError::comment_not_found(&topic_id, &comment_id).into_response(),
    };
    Ok(res)
}

#[utoipa::path(
    delete,
    path = COMMENT_PATH,
    responses(
        (status = NO_CONTENT, description = "The comment was removed"),
        (status = NOT_FOUND, description = "The topic has no comment with the given id", body = DiscussionError),
        (status = UNPROCESSABLE_ENTITY, description = "The topic does not exist", body = DiscussionError),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic the comment belongs to"),
        ("comment_id" = String, Path, description = "The comment to remove"),
    )
)]
#[instrument(skip(usecase), err(Debug))]
pub async fn delete_comment<E: DiscussionEngine>(
    State(usecase): State<CommentUsecase<E>>,
    Path((topic_id, comment_id)): Path<(TopicId, CommentId)>,
) -> Result<Response, EndpointError<CommentServiceError>> {
    if usecase.delete(&topic_id, &comment_id).await? {
        metrics::increment_comments_deleted();
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(DiscussionError::comment_not_found(&topic_id, &comment_id).into_response())
    }
}
