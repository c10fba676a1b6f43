use crate::{TestRuntime, runtime};
use discussions_core::id::{CommentId, TopicId};
use discussions_core::model::{Comment, CommentPatch, NewComment};
use discussions_core::result::CommentRepoError;
use discussions_core::{CommentRepository, TopicRepository};
use rstest::rstest;

fn comment_in(topic_id: &str, content: &str) -> Comment {
    Comment::create(TopicId::new(topic_id), NewComment::new(content, "bob"))
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn create_then_get_returns_created_comment(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.comments();
    let comment = comment_in("t1", "hi");

    let id = repo.create(comment.clone()).await.unwrap();
    let found = repo
        .get(&TopicId::new("t1"), &id)
        .await
        .unwrap()
        .expect("recently created comment exists");

    assert_eq!(comment.comment_id, id);
    assert_eq!(comment.content, found.content);
    assert_eq!(comment.created, found.created);
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn get_with_wrong_topic_returns_none(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.comments();
    let id = repo.create(comment_in("t1", "hi")).await.unwrap();

    let found = repo.get(&TopicId::new("t2"), &id).await.unwrap();

    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn find_by_topic_only_returns_that_topics_comments(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.comments();
    for i in 0..3 {
        repo.create(comment_in("t1", &format!("c{i}"))).await.unwrap();
    }
    repo.create(comment_in("t2", "elsewhere")).await.unwrap();

    let all = repo.find_by_topic(&TopicId::new("t1"), 0, 10).await.unwrap();
    let paged = repo.find_by_topic(&TopicId::new("t1"), 1, 1).await.unwrap();

    assert_eq!(3, all.len());
    assert!(all.iter().all(|c| c.topic_id == TopicId::new("t1")));
    assert_eq!(1, paged.len());
    assert_eq!("c1", paged[0].content);
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn comments_are_not_visible_as_topics(#[future(awt)] runtime: TestRuntime) {
    let id = runtime
        .store
        .comments()
        .create(comment_in("t1", "hi"))
        .await
        .unwrap();

    let as_topic = runtime.store.topics().get(&TopicId::new(id.as_str())).await.unwrap();
    let topics = runtime.store.topics().find(0, 10).await.unwrap();

    assert!(as_topic.is_none());
    assert!(topics.is_empty());
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn update_merges_only_set_fields(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.comments();
    let id = repo.create(comment_in("t1", "hi")).await.unwrap();

    let modified = repo
        .update(
            &TopicId::new("t1"),
            &id,
            CommentPatch::new(Some("edited".to_string())).touched(chrono::Utc::now()),
        )
        .await
        .unwrap();
    let found = repo.get(&TopicId::new("t1"), &id).await.unwrap().unwrap();

    assert_eq!(1, modified);
    assert_eq!("edited", found.content);
    assert_eq!("bob", found.username);
    assert!(found.updated.is_some());
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn delete_twice_removes_once(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.comments();
    let id = repo.create(comment_in("t1", "hi")).await.unwrap();

    assert_eq!(1, repo.delete(&TopicId::new("t1"), &id).await.unwrap());
    assert_eq!(0, repo.delete(&TopicId::new("t1"), &id).await.unwrap());
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn duplicate_comment_id_is_rejected(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.comments();
    let first = Comment::create(
        TopicId::new("t1"),
        NewComment::new("hi", "bob").with_id(CommentId::new("c1")),
    );
    let second = Comment::create(
        TopicId::new("t2"),
        NewComment::new("hi again", "amy").with_id(CommentId::new("c1")),
    );

    repo.create(first).await.unwrap();
    let err = repo.create(second).await.unwrap_err();

    assert!(matches!(err.current_context(), CommentRepoError::DuplicateId));
}
