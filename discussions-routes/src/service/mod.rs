mod comments;
mod topics;

pub use comments::CommentUsecase;
pub use topics::TopicService;
