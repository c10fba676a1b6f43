use discussions_core::id::{CommentId, TopicId};
use discussions_core::model::{NewComment, NewTopic, PatchTopic};
use discussions_core::search::{TopicFilter, TopicSearch};
use engine::patch_field_schema;
use optional_field::{Field, serde_optional_fields};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTopicRequest {
    pub title: String,
    pub body: Option<String>,
    pub username: String,
}

impl From<CreateTopicRequest> for NewTopic {
    fn from(value: CreateTopicRequest) -> Self {
        NewTopic::new(value.title, value.body, value.username)
    }
}

#[serde_optional_fields]
#[derive(Debug, Deserialize, ToSchema)]
pub struct TopicPatchRequest {
    /// The new title of the topic. Cannot be blank. If null or not specified, no update will happen.
    pub title: Option<String>,
    /// The new body of the topic. If specified as null, the body is cleared.
    /// If not specified, no update will happen.
    #[schema(schema_with = patch_field_schema)]
    pub body: Field<String>,
}

impl From<TopicPatchRequest> for PatchTopic {
    fn from(value: TopicPatchRequest) -> Self {
        PatchTopic::new(value.title, value.body)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopicSearchQuery {
    /// Free text matched against topic titles and bodies.
    pub term: Option<String>,
    /// Exact title to match.
    pub title: Option<String>,
    /// Exact author to match.
    pub username: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

impl TopicSearchQuery {
    pub fn into_search(self, default_limit: u64) -> TopicSearch {
        let mut search = TopicSearch::new(self.skip, self.limit.unwrap_or(default_limit));
        if let Some(title) = self.title {
            search.add(TopicFilter::Title(title));
        }
        if let Some(username) = self.username {
            search.add(TopicFilter::Username(username));
        }
        match self.term {
            Some(term) => search.with_term(term),
            None => search,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    /// Optional caller chosen id. One is generated when left out.
    #[serde(default)]
    pub comment_id: Option<CommentId>,
    /// Ignored, the topic in the path is always used.
    #[serde(default, alias = "topic")]
    pub topic_id: Option<TopicId>,
    /// The comment in the same topic being replied to.
    #[serde(default, alias = "reply")]
    pub reply_comment_id: Option<CommentId>,
    pub content: String,
    pub username: String,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(value: CreateCommentRequest) -> Self {
        NewComment {
            comment_id: value.comment_id,
            topic_id: value.topic_id,
            reply_comment_id: value.reply_comment_id,
            content: value.content,
            username: value.username,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentPatchRequest {
    /// The new content. Cannot be blank. If null or not specified, no update will happen.
    #[serde(default)]
    pub content: Option<String>,
}
