use super::{ID_FIELD, collection, kind_filter, mongo_limit};
use bson::{Document, doc};
use chrono::{DateTime, Utc};
use discussions_core::CommentRepository;
use discussions_core::id::{CommentId, TopicId};
use discussions_core::model::{Comment, CommentPatch, DiscussionType};
use discussions_core::result::{CommentRepoError, OptRepoResult, RepoResult};
use error_stack::{Report, ResultExt};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

pub(crate) const TOPIC_FIELD: &str = "topic";
const CONTENT_FIELD: &str = "content";
const UPDATED_FIELD: &str = "updated";

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
struct MongoComment {
    #[serde(rename = "_id")]
    id: CommentId,
    #[serde(rename = "topic")]
    topic_id: TopicId,
    #[serde(rename = "reply")]
    reply_comment_id: Option<CommentId>,
    content: String,
    username: String,
    #[serde(rename = "type")]
    discussion_type: DiscussionType,
    created: DateTime<Utc>,
    updated: Option<DateTime<Utc>>,
}

impl From<Comment> for MongoComment {
    fn from(value: Comment) -> Self {
        Self {
            id: value.comment_id,
            topic_id: value.topic_id,
            reply_comment_id: value.reply_comment_id,
            content: value.content,
            username: value.username,
            discussion_type: DiscussionType::Comment,
            created: value.created,
            updated: value.updated,
        }
    }
}

impl From<MongoComment> for Comment {
    fn from(value: MongoComment) -> Self {
        Self {
            comment_id: value.id,
            topic_id: value.topic_id,
            reply_comment_id: value.reply_comment_id,
            content: value.content,
            username: value.username,
            created: value.created,
            updated: value.updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentRepo {
    db: Database,
    collection_name: Arc<str>,
}

impl CommentRepo {
    pub(super) fn new(db: Database, collection_name: Arc<str>) -> Self {
        Self {
            db,
            collection_name,
        }
    }

    fn comments(&self) -> Collection<MongoComment> {
        collection(&self.db, &self.collection_name)
    }
}

fn topic_comments_filter(topic_id: &TopicId) -> Document {
    let mut filter = kind_filter(DiscussionType::Comment);
    filter.insert(TOPIC_FIELD, topic_id.as_str());
    filter
}

fn comment_filter(topic_id: &TopicId, comment_id: &CommentId) -> Document {
    let mut filter = topic_comments_filter(topic_id);
    filter.insert(ID_FIELD, comment_id.as_str());
    filter
}

/// Only the fields set on the patch end up in the `$set` document.
fn update_document(patch: CommentPatch) -> RepoResult<Document, CommentRepoError> {
    let mut update_document = Document::new();
    if let Some(content) = patch.content {
        update_document.insert(CONTENT_FIELD, content);
    }

    if let Some(updated) = patch.updated {
        update_document.insert(
            UPDATED_FIELD,
            bson::to_bson(&updated).change_context(CommentRepoError::Update)?,
        );
    }

    Ok(update_document)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl CommentRepository for CommentRepo {
    async fn find_by_topic(
        &self,
        topic_id: &TopicId,
        skip: u64,
        limit: u64,
    ) -> RepoResult<Vec<Comment>, CommentRepoError> {
        let limit = mongo_limit(limit)
            .ok_or(CommentRepoError::FindByTopic)
            .attach_with(|| format!("invalid limit {limit}. It is too large and not supported"))?;

        let options = FindOptions::builder().skip(skip).limit(limit).build();

        self.comments()
            .find(topic_comments_filter(topic_id))
            .with_options(options)
            .await
            .change_context(CommentRepoError::FindByTopic)?
            .map(|c| c.map(From::from))
            .collect::<Result<_, _>>()
            .await
            .change_context(CommentRepoError::FindByTopic)
    }

    async fn get(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> OptRepoResult<Comment, CommentRepoError> {
        self.comments()
            .find_one(comment_filter(topic_id, comment_id))
            .await
            .change_context(CommentRepoError::Get)
            .map(|c| c.map(From::from))
    }

    async fn create(&self, comment: Comment) -> RepoResult<CommentId, CommentRepoError> {
        let comment = MongoComment::from(comment);

        let result = match self.comments().insert_one(&comment).await {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => {
                return Err(Report::new(e)
                    .change_context(CommentRepoError::DuplicateId)
                    .attach(format!("comment id {} is already taken", comment.id)));
            }
            Err(e) => return Err(Report::new(e).change_context(CommentRepoError::Create)),
        };

        result
            .inserted_id
            .as_str()
            .map(CommentId::new)
            .ok_or(CommentRepoError::Create)
            .attach_with(|| format!("inserted id for comment {} was not a string", comment.id))
    }

    async fn update(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
        patch: CommentPatch,
    ) -> RepoResult<u64, CommentRepoError> {
        let update_document = update_document(patch)?;
        if update_document.is_empty() {
            warn!("no comment patch fields specified, nothing to update");
            return Ok(0);
        }

        debug!("updating comment {comment_id} with {update_document:?}");

        self.comments()
            .update_one(
                comment_filter(topic_id, comment_id),
                doc! { "$set": update_document },
            )
            .await
            .change_context(CommentRepoError::Update)
            .map(|r| r.modified_count)
    }

    async fn delete(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> RepoResult<u64, CommentRepoError> {
        self.comments()
            .delete_one(comment_filter(topic_id, comment_id))
            .await
            .change_context(CommentRepoError::Delete)
            .map(|r| r.deleted_count)
    }
}
