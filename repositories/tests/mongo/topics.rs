use crate::{TestRuntime, runtime};
use discussions_core::TopicRepository;
use discussions_core::id::TopicId;
use discussions_core::model::{NewTopic, PatchTopic, Topic};
use discussions_core::search::{TopicFilter, TopicSearch};
use optional_field::Field;
use rstest::rstest;

fn topic(title: &str, body: Option<&str>) -> Topic {
    Topic::create(NewTopic::new(
        title.to_string(),
        body.map(str::to_string),
        "amy".to_string(),
    ))
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn get_no_data_returns_none(#[future(awt)] runtime: TestRuntime) {
    let result = runtime
        .store
        .topics()
        .get(&TopicId::generate())
        .await
        .unwrap();

    assert!(result.is_none());
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn create_then_get_returns_created_topic(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.topics();
    let created = topic("rust", Some("borrow checker"));

    let id = repo.create(created.clone()).await.unwrap();
    let found = repo.get(&id).await.unwrap().expect("recently created topic exists");

    assert_eq!(created, found);
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn find_pages_with_skip_and_limit(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.topics();
    for i in 0..5 {
        repo.create(topic(&format!("topic{i}"), None)).await.unwrap();
    }

    let listed = repo.find(2, 2).await.unwrap();

    assert_eq!(2, listed.len());
    assert_eq!("topic2", listed[0].title);
    assert_eq!("topic3", listed[1].title);
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn term_search_returns_weakest_match_first(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.topics();
    repo.create(topic("rust rust rust", Some("rust everywhere rust")))
        .await
        .unwrap();
    repo.create(topic("gardening", Some("one mention of rust")))
        .await
        .unwrap();
    repo.create(topic("cooking", None)).await.unwrap();

    let found = repo
        .search(TopicSearch::new(0, 10).with_term("rust"))
        .await
        .unwrap();

    assert_eq!(2, found.len());
    assert_eq!("gardening", found[0].title);
    assert_eq!("rust rust rust", found[1].title);
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn search_applies_equality_filters(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.topics();
    repo.create(topic("first", None)).await.unwrap();
    repo.create(topic("second", None)).await.unwrap();

    let found = repo
        .search(TopicSearch::new(0, 10).with(TopicFilter::Title("second".to_string())))
        .await
        .unwrap();

    assert_eq!(1, found.len());
    assert_eq!("second", found[0].title);
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn update_with_null_body_clears_it(#[future(awt)] runtime: TestRuntime) {
    let repo = runtime.store.topics();
    let id = repo.create(topic("rust", Some("body"))).await.unwrap();

    let modified = repo
        .update(&id, PatchTopic::new(None, Field::Present(None)))
        .await
        .unwrap();
    let found = repo.get(&id).await.unwrap().unwrap();

    assert_eq!(1, modified);
    assert_eq!(None, found.body);
    assert_eq!("rust", found.title);
}

#[rstest]
#[tokio::test]
#[ignore = "requires docker"]
async fn delete_missing_topic_removes_nothing(#[future(awt)] runtime: TestRuntime) {
    let removed = runtime
        .store
        .topics()
        .delete(&TopicId::generate())
        .await
        .unwrap();

    assert_eq!(0, removed);
}
