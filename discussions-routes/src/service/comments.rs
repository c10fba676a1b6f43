use crate::error::CommentServiceError;
use crate::{OptServiceResult, ServiceResult};
use chrono::Utc;
use discussions_core::id::{CommentId, TopicId};
use discussions_core::model::{Comment, CommentPatch, NewComment};
use discussions_core::result::CommentRepoError;
use discussions_core::{CommentRepository, DiscussionEngine, TopicRepository};
use error_stack::{Report, ResultExt};
use tracing::{debug, instrument, warn};

/// Comment operations that keep comments consistent with the topics they belong to.
///
/// Every operation on a single comment first checks that the topic exists, and a reply
/// must point at a comment in the same topic. Listing does not check, a missing topic
/// simply has no comments.
#[derive(Debug, Clone)]
pub struct CommentUsecase<E> {
    engine: E,
}

impl<E: DiscussionEngine> CommentUsecase<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    #[instrument(skip(self), name = "usecase#find_by_topic")]
    pub async fn find_by_topic(
        &self,
        topic_id: &TopicId,
        skip: u64,
        limit: u64,
    ) -> ServiceResult<Vec<Comment>, CommentServiceError> {
        self.engine
            .comments()
            .find_by_topic(topic_id, skip, limit)
            .await
            .change_context(CommentServiceError::Repository)
    }

    #[instrument(skip(self), name = "usecase#get")]
    pub async fn get(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> OptServiceResult<Comment, CommentServiceError> {
        self.ensure_topic_exists(topic_id).await?;

        self.engine
            .comments()
            .get(topic_id, comment_id)
            .await
            .change_context(CommentServiceError::Repository)
    }

    /// Stores a new comment under `topic_id` and returns it as persisted.
    ///
    /// Any topic claimed inside `new_comment` is ignored.
    #[instrument(skip(self, new_comment), name = "usecase#create", fields(
        comment.username = new_comment.username.as_str(),
        comment.reply = new_comment.reply_comment_id.as_ref().map(CommentId::as_str),
    ))]
    pub async fn create(
        &self,
        topic_id: TopicId,
        new_comment: NewComment,
    ) -> ServiceResult<Comment, CommentServiceError> {
        self.ensure_topic_exists(&topic_id).await?;

        let comments = self.engine.comments();
        if let Some(reply_comment_id) = &new_comment.reply_comment_id {
            let replied_to = comments
                .get(&topic_id, reply_comment_id)
                .await
                .change_context(CommentServiceError::Repository)?;

            if replied_to.is_none() {
                debug!("comment {reply_comment_id} to reply to is not in topic {topic_id}");
                return Err(Report::new(
                    CommentServiceError::CommentNotFoundToBeReplied(reply_comment_id.clone()),
                ));
            }
        }

        if let Some(claimed) = new_comment
            .topic_id
            .as_ref()
            .filter(|claimed| **claimed != topic_id)
        {
            warn!("ignoring topic {claimed} given with the new comment, using {topic_id}");
        }

        let comment = Comment::create(topic_id.clone(), new_comment);
        let comment_id = comment.comment_id.clone();

        let inserted_id = comments.create(comment).await.map_err(|report| {
            if matches!(report.current_context(), CommentRepoError::DuplicateId) {
                report.change_context(CommentServiceError::CommentAlreadyExists(comment_id))
            } else {
                report.change_context(CommentServiceError::Repository)
            }
        })?;

        comments
            .get(&topic_id, &inserted_id)
            .await
            .change_context(CommentServiceError::Repository)?
            .ok_or(CommentServiceError::Repository)
            .attach_with(|| format!("created comment {inserted_id} could not be read back"))
    }

    /// Applies `patch` to the comment and returns the comment as now stored,
    /// or `None` when the topic has no such comment.
    #[instrument(skip(self, patch), name = "usecase#update")]
    pub async fn update(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
        patch: CommentPatch,
    ) -> OptServiceResult<Comment, CommentServiceError> {
        self.ensure_topic_exists(topic_id).await?;

        let comments = self.engine.comments();
        if patch.is_empty() {
            debug!("no comment fields to update, returning the stored comment");
        } else {
            let modified = comments
                .update(topic_id, comment_id, patch.touched(Utc::now()))
                .await
                .change_context(CommentServiceError::Repository)?;

            if modified == 0 {
                debug!("comment {comment_id} was not modified");
            }
        }

        comments
            .get(topic_id, comment_id)
            .await
            .change_context(CommentServiceError::Repository)
    }

    /// Returns whether a comment was actually removed.
    #[instrument(skip(self), name = "usecase#delete")]
    pub async fn delete(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> ServiceResult<bool, CommentServiceError> {
        self.ensure_topic_exists(topic_id).await?;

        let removed = self
            .engine
            .comments()
            .delete(topic_id, comment_id)
            .await
            .change_context(CommentServiceError::Repository)?;

        Ok(removed == 1)
    }

    async fn ensure_topic_exists(&self, topic_id: &TopicId) -> ServiceResult<(), CommentServiceError> {
        let topic = self
            .engine
            .topics()
            .get(topic_id)
            .await
            .change_context(CommentServiceError::Repository)?;

        match topic {
            Some(_) => Ok(()),
            None => {
                debug!("topic {topic_id} does not exist");
                Err(Report::new(CommentServiceError::TopicNotFound(
                    topic_id.clone(),
                )))
            }
        }
    }
}
