use error_stack::Report;

pub type RepoResult<T, E> = Result<T, Report<E>>;
pub type OptRepoResult<T, E> = Result<Option<T>, Report<E>>;

#[derive(Debug, thiserror::Error)]
pub enum TopicRepoError {
    #[error("failed to get topic")]
    Get,
    #[error("failed to find topics")]
    Find,
    #[error("failed to search topics")]
    Search,
    #[error("failed to create topic")]
    Create,
    #[error("failed to update topic")]
    Update,
    #[error("failed to delete topic")]
    Delete,
}

#[derive(Debug, thiserror::Error)]
pub enum CommentRepoError {
    #[error("failed to get comment")]
    Get,
    #[error("failed to find comments for topic")]
    FindByTopic,
    #[error("failed to create comment")]
    Create,
    #[error("a comment with the same id already exists")]
    DuplicateId,
    #[error("failed to update comment")]
    Update,
    #[error("failed to delete comment")]
    Delete,
}
