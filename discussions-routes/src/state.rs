use crate::error::MetricsError;
use crate::metrics;
use crate::service::{CommentUsecase, TopicService};
use axum::extract::FromRef;
use discussions_core::DiscussionEngine;
use error_stack::Report;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct DiscussionAppState<E: DiscussionEngine> {
    pub topics: TopicService<E>,
    pub comments: CommentUsecase<E>,
    pub metrics: Option<PrometheusHandle>,
}

impl<E: DiscussionEngine> DiscussionAppState<E> {
    /// Fails if a metrics recorder was already installed in this process.
    pub fn new_with_metrics(engine: E) -> Result<Self, Report<MetricsError>> {
        let handle = metrics::setup_recorder()?;
        Ok(Self {
            metrics: Some(handle),
            ..Self::new_without_metrics(engine)
        })
    }

    pub fn new_without_metrics(engine: E) -> Self {
        Self {
            topics: TopicService::new(engine.clone()),
            comments: CommentUsecase::new(engine),
            metrics: None,
        }
    }
}

impl<E: DiscussionEngine> FromRef<DiscussionAppState<E>> for TopicService<E> {
    fn from_ref(input: &DiscussionAppState<E>) -> Self {
        input.topics.clone()
    }
}

impl<E: DiscussionEngine> FromRef<DiscussionAppState<E>> for CommentUsecase<E> {
    fn from_ref(input: &DiscussionAppState<E>) -> Self {
        input.comments.clone()
    }
}
