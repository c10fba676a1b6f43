use crate::id::{CommentId, TopicId};
use chrono::{DateTime, Utc};
use optional_field::Field;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Marks what kind of document is stored when topics and comments share a collection.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionType {
    Topic,
    Comment,
}

impl DiscussionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiscussionType::Topic => "topic",
            DiscussionType::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTopic {
    pub title: String,
    pub body: Option<String>,
    pub username: String,
}

impl NewTopic {
    pub fn new(title: String, body: Option<String>, username: String) -> Self {
        Self {
            title,
            body,
            username,
        }
    }
}

#[derive(Debug)]
pub struct PatchTopic {
    pub title: Option<String>,
    pub body: Field<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl PatchTopic {
    pub fn new(title: Option<String>, body: Field<String>) -> Self {
        Self {
            title,
            body,
            updated: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && matches!(self.body, Field::Missing) && self.updated.is_none()
    }

    pub fn touched(self, at: DateTime<Utc>) -> Self {
        Self {
            updated: Some(at),
            ..self
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Topic {
    pub topic_id: TopicId,
    pub title: String,
    pub body: Option<String>,
    pub username: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl Topic {
    pub fn create(new_topic: NewTopic) -> Self {
        Self {
            topic_id: TopicId::generate(),
            title: new_topic.title,
            body: new_topic.body,
            username: new_topic.username,
            created: Utc::now(),
            updated: None,
        }
    }
}

/// A comment as submitted by a caller, before the owning topic has been checked.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub comment_id: Option<CommentId>,
    /// Whatever topic the caller claimed. Never persisted, the path topic always wins.
    pub topic_id: Option<TopicId>,
    pub reply_comment_id: Option<CommentId>,
    pub content: String,
    pub username: String,
}

impl NewComment {
    pub fn new(content: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            comment_id: None,
            topic_id: None,
            reply_comment_id: None,
            content: content.into(),
            username: username.into(),
        }
    }

    pub fn replying_to(self, reply_comment_id: CommentId) -> Self {
        Self {
            reply_comment_id: Some(reply_comment_id),
            ..self
        }
    }

    pub fn with_id(self, comment_id: CommentId) -> Self {
        Self {
            comment_id: Some(comment_id),
            ..self
        }
    }

    pub fn claiming_topic(self, topic_id: TopicId) -> Self {
        Self {
            topic_id: Some(topic_id),
            ..self
        }
    }
}

/// Sparse set of comment fields to merge into a stored comment.
/// `None` means the field is left untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommentPatch {
    pub content: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl CommentPatch {
    pub fn new(content: Option<String>) -> Self {
        Self {
            content,
            updated: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.updated.is_none()
    }

    pub fn touched(self, at: DateTime<Utc>) -> Self {
        Self {
            updated: Some(at),
            ..self
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Comment {
    pub comment_id: CommentId,
    pub topic_id: TopicId,
    pub reply_comment_id: Option<CommentId>,
    pub content: String,
    pub username: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl Comment {
    /// Builds the comment to persist under `topic_id`, ignoring any topic the caller claimed.
    pub fn create(topic_id: TopicId, new_comment: NewComment) -> Self {
        Self {
            comment_id: new_comment.comment_id.unwrap_or_else(CommentId::generate),
            topic_id,
            reply_comment_id: new_comment.reply_comment_id,
            content: new_comment.content,
            username: new_comment.username,
            created: Utc::now(),
            updated: None,
        }
    }
}
