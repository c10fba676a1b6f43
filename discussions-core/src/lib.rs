use id::{CommentId, TopicId};
use model::{Comment, CommentPatch, PatchTopic, Topic};
use result::{CommentRepoError, OptRepoResult, RepoResult, TopicRepoError};
use search::TopicSearch;

pub mod id;
pub mod model;
pub mod result;
pub mod search;

/// Hands out the repositories a service works against.
/// Repository handles are expected to be cheap to clone and hold no per-request state.
pub trait DiscussionEngine: Clone + Send + Sync + 'static {
    type Topics: TopicRepository + Send + Sync + 'static;
    type Comments: CommentRepository + Send + Sync + 'static;

    fn topics(&self) -> Self::Topics;

    fn comments(&self) -> Self::Comments;
}

/// Storage for topics. Only ever sees documents marked as topics.
pub trait TopicRepository {
    fn find(
        &self,
        skip: u64,
        limit: u64,
    ) -> impl Future<Output = RepoResult<Vec<Topic>, TopicRepoError>> + Send;

    /// With a search term, results are ordered by ascending text score before paging.
    fn search(
        &self,
        search: TopicSearch,
    ) -> impl Future<Output = RepoResult<Vec<Topic>, TopicRepoError>> + Send;

    fn get(
        &self,
        topic_id: &TopicId,
    ) -> impl Future<Output = OptRepoResult<Topic, TopicRepoError>> + Send;

    fn create(&self, topic: Topic)
    -> impl Future<Output = RepoResult<TopicId, TopicRepoError>> + Send;

    /// Returns the number of topics modified, 0 or 1.
    fn update(
        &self,
        topic_id: &TopicId,
        patch: PatchTopic,
    ) -> impl Future<Output = RepoResult<u64, TopicRepoError>> + Send;

    /// Returns the number of topics removed, 0 or 1.
    fn delete(
        &self,
        topic_id: &TopicId,
    ) -> impl Future<Output = RepoResult<u64, TopicRepoError>> + Send;
}

/// Storage for comments, scoped by the topic they belong to.
/// No business rules live here; the caller decides whether a write is allowed.
pub trait CommentRepository {
    fn find_by_topic(
        &self,
        topic_id: &TopicId,
        skip: u64,
        limit: u64,
    ) -> impl Future<Output = RepoResult<Vec<Comment>, CommentRepoError>> + Send;

    fn get(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> impl Future<Output = OptRepoResult<Comment, CommentRepoError>> + Send;

    fn create(
        &self,
        comment: Comment,
    ) -> impl Future<Output = RepoResult<CommentId, CommentRepoError>> + Send;

    /// Merges the set fields of `patch` into the matching comment.
    /// Returns the number of comments modified, 0 or 1.
    fn update(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
        patch: CommentPatch,
    ) -> impl Future<Output = RepoResult<u64, CommentRepoError>> + Send;

    /// Returns the number of comments removed, 0 or 1.
    fn delete(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> impl Future<Output = RepoResult<u64, CommentRepoError>> + Send;
}
