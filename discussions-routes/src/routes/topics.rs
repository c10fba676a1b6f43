use super::requests::{CreateTopicRequest, TopicPatchRequest, TopicSearchQuery};
use super::responses::{DiscussionError, DiscussionResponse};
use crate::error::TopicServiceError;
use crate::metrics;
use crate::service::TopicService;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use discussions_core::DiscussionEngine;
use discussions_core::id::TopicId;
use discussions_core::model::{PatchTopic, Topic};
use engine::Pagination;
use engine::error::EndpointError;
use engine::stream::StreamingResponse;
use tracing::instrument;

pub(super) const TOPIC_LIST_PATH: &str = "/";
pub(super) const TOPIC_SEARCH_PATH: &str = "/search";
pub(super) const TOPIC_PATH: &str = "/{topic_id}";

const DEFAULT_TOPIC_PAGE_SIZE: u64 = 10;

#[utoipa::path(
    get,
    path = TOPIC_LIST_PATH,
    responses(
        (status = OK, description = "The topics on the requested page, possibly none", body = Vec<Topic>),
    ),
    params(
        ("skip" = Option<u64>, Query, description = "How many topics to skip"),
        ("limit" = Option<u64>, Query, description = "The max number of topics to return"),
    )
)]
#[instrument(skip(service), err(Debug), fields(req.skip = pagination.skip, req.limit = pagination.limit))]
pub async fn list_topics<E: DiscussionEngine>(
    State(service): State<TopicService<E>>,
    Query(pagination): Query<Pagination>,
) -> Result<Response, EndpointError<TopicServiceError>> {
    let topics = service
        .list(pagination.skip, pagination.limit_or(DEFAULT_TOPIC_PAGE_SIZE))
        .await?;

    metrics::increment_topics_retrieved_by(topics.len());
    Ok(StreamingResponse::ok(topics).into_response())
}

/// Search topics. When a term is given, the weakest text matches come first.
#[utoipa::path(
    get,
    path = TOPIC_SEARCH_PATH,
    responses(
        (status = OK, description = "The matching topics on the requested page, possibly none", body = Vec<Topic>),
    ),
    params(TopicSearchQuery)
)]
#[instrument(skip(service), err(Debug))]
pub async fn search_topics<E: DiscussionEngine>(
    State(service): State<TopicService<E>>,
    Query(query): Query<TopicSearchQuery>,
) -> Result<Response, EndpointError<TopicServiceError>> {
    let topics = service
        .search(query.into_search(DEFAULT_TOPIC_PAGE_SIZE))
        .await?;

    metrics::increment_topics_retrieved_by(topics.len());
    Ok(StreamingResponse::ok(topics).into_response())
}

#[utoipa::path(
    get,
    path = TOPIC_PATH,
    responses(
        (status = OK, description = "A topic was found with the given id", body = Topic),
        (status = NOT_FOUND, description = "No topic has the given id", body = DiscussionError),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic to find"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_topic<E: DiscussionEngine>(
    State(service): State<TopicService<E>>,
    Path(topic_id): Path<TopicId>,
) -> Result<Response, EndpointError<TopicServiceError>> {
    let topic = service.get(&topic_id).await?;

    Ok(topic
        .map(|t| DiscussionResponse::ok(t).into_response())
        .unwrap_or_else(|| DiscussionError::topic_not_found().into_response()))
}

#[utoipa::path(
    post,
    path = TOPIC_LIST_PATH,
    responses(
        (status = CREATED, description = "The topic was created", body = Topic),
        (status = UNPROCESSABLE_ENTITY, description = "The title or username was blank", body = DiscussionError),
    ),
    request_body = CreateTopicRequest
)]
#[instrument(skip_all, err(Debug), fields(req.title = topic.title.as_str(), req.username = topic.username.as_str()))]
pub async fn create_topic<E: DiscussionEngine>(
    State(service): State<TopicService<E>>,
    Json(topic): Json<CreateTopicRequest>,
) -> Result<Response, EndpointError<TopicServiceError>> {
    if topic.title.trim().is_empty() {
        return Ok(DiscussionError::unprocessable_entity("title cannot be blank").into_response());
    }
    if topic.username.trim().is_empty() {
        return Ok(DiscussionError::unprocessable_entity("username cannot be blank").into_response());
    }

    let created = service.create(topic.into()).await?;

    metrics::increment_topics_created();
    Ok(DiscussionResponse::created(created).into_response())
}

#[utoipa::path(
    put,
    path = TOPIC_PATH,
    responses(
        (status = OK, description = "The topic as stored after the update", body = Topic),
        (status = NOT_FOUND, description = "No topic has the given id", body = DiscussionError),
        (status = UNPROCESSABLE_ENTITY, description = "The title was blank", body = DiscussionError),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic to update"),
    ),
    request_body = TopicPatchRequest
)]
#[instrument(skip(service, topic), err(Debug), fields(
    topic.title = topic.title.as_deref(),
    topic.body = topic.body.as_ref().map_present_or(None, |b| Some(b.map(String::as_str).unwrap_or("null"))),
))]
pub async fn update_topic<E: DiscussionEngine>(
    State(service): State<TopicService<E>>,
    Path(topic_id): Path<TopicId>,
    Json(topic): Json<TopicPatchRequest>,
) -> Result<Response, EndpointError<TopicServiceError>> {
    if topic.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Ok(DiscussionError::unprocessable_entity("title cannot be blank").into_response());
    }

    let patch = PatchTopic::from(topic);
    let writes = !patch.is_empty();

    let res = match service.update(&topic_id, patch).await? {
        Some(updated) => {
            if writes {
                metrics::increment_topics_updated();
            }
            DiscussionResponse::ok(updated).into_response()
        }
        None => DiscussionError::topic_not_found().into_response(),
    };
    Ok(res)
}

/// Delete a topic. Its comments are not removed.
#[utoipa::path(
    delete,
    path = TOPIC_PATH,
    responses(
        (status = NO_CONTENT, description = "The topic was removed"),
        (status = NOT_FOUND, description = "No topic has the given id", body = DiscussionError),
    ),
    params(
        ("topic_id" = String, Path, description = "The topic to delete"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn delete_topic<E: DiscussionEngine>(
    State(service): State<TopicService<E>>,
    Path(topic_id): Path<TopicId>,
) -> Result<Response, EndpointError<TopicServiceError>> {
    if service.delete(&topic_id).await? {
        metrics::increment_topics_deleted();
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(DiscussionError::topic_not_found().into_response())
    }
}
