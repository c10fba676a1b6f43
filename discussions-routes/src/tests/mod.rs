//! Tests for the comment usecase and the HTTP contract, run against an in-memory engine.
use chrono::Utc;
use discussions_core::id::{CommentId, TopicId};
use discussions_core::model::{Comment, CommentPatch, NewTopic, PatchTopic, Topic};
use discussions_core::result::{CommentRepoError, OptRepoResult, RepoResult, TopicRepoError};
use discussions_core::search::{TopicFilter, TopicSearch};
use discussions_core::{CommentRepository, DiscussionEngine, TopicRepository};
use error_stack::Report;
use optional_field::Field;
use std::sync::{Arc, Mutex, MutexGuard};


#[derive(Debug, Default)]
struct Store {
    topics: Vec<Topic>,
    comments: Vec<Comment>,
    comment_writes: usize,
    unavailable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryEngine {
    store: Arc<Mutex<Store>>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub fn add_topic(&self, title: &str) -> Topic {
        self.add_topic_with_body(title, None)
    }

    pub fn add_topic_with_body(&self, title: &str, body: Option<&str>) -> Topic {
        let topic = Topic::create(NewTopic::new(
            title.to_string(),
            body.map(str::to_string),
            "amy".to_string(),
        ));
        self.lock().topics.push(topic.clone());
        topic
    }

    pub fn add_comment(&self, comment: Comment) -> Comment {
        self.lock().comments.push(comment.clone());
        comment
    }

    /// Number of create, update or delete calls that reached the comment store.
    pub fn comment_writes(&self) -> usize {
        self.lock().comment_writes
    }

    pub fn stored_comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    /// Every repository call fails from now on.
    pub fn go_down(&self) {
        self.lock().unavailable = true;
    }
}

impl DiscussionEngine for InMemoryEngine {
    type Topics = InMemoryTopics;
    type Comments = InMemoryComments;

    fn topics(&self) -> Self::Topics {
        InMemoryTopics(Arc::clone(&self.store))
    }

    fn comments(&self) -> Self::Comments {
        InMemoryComments(Arc::clone(&self.store))
    }
}

fn page<T>(items: impl Iterator<Item = T>, skip: u64, limit: u64) -> Vec<T> {
    items.skip(skip as usize).take(limit as usize).collect()
}

fn term_score(topic: &Topic, term: &str) -> usize {
    let term = term.to_lowercase();
    topic
        .title
        .split_whitespace()
        .chain(topic.body.iter().flat_map(|b| b.split_whitespace()))
        .filter(|word| word.to_lowercase() == term)
        .count()
}

pub struct InMemoryTopics(Arc<Mutex<Store>>);

impl InMemoryTopics {
    fn store(&self, fail_with: TopicRepoError) -> RepoResult<MutexGuard<'_, Store>, TopicRepoError> {
        let store = self.0.lock().unwrap();
        if store.unavailable {
            return Err(Report::new(fail_with));
        }
        Ok(store)
    }
}

impl TopicRepository for InMemoryTopics {
    async fn find(&self, skip: u64, limit: u64) -> RepoResult<Vec<Topic>, TopicRepoError> {
        let store = self.store(TopicRepoError::Find)?;
        Ok(page(store.topics.iter().cloned(), skip, limit))
    }

    async fn search(&self, search: TopicSearch) -> RepoResult<Vec<Topic>, TopicRepoError> {
        let store = self.store(TopicRepoError::Search)?;
        let mut matches = store
            .topics
            .iter()
            .filter(|t| {
                search.filters().iter().all(|f| match f {
                    TopicFilter::Title(title) => &t.title == title,
                    TopicFilter::Username(username) => &t.username == username,
                })
            })
            .map(|t| (search.term().map(|term| term_score(t, term)), t.clone()))
            .filter(|(score, _)| score.is_none_or(|s| s > 0))
            .collect::<Vec<_>>();

        matches.sort_by_key(|(score, _)| *score);
        Ok(page(
            matches.into_iter().map(|(_, t)| t),
            search.skip(),
            search.limit(),
        ))
    }

    async fn get(&self, topic_id: &TopicId) -> OptRepoResult<Topic, TopicRepoError> {
        let store = self.store(TopicRepoError::Get)?;
        Ok(store.topics.iter().find(|t| &t.topic_id == topic_id).cloned())
    }

    async fn create(&self, topic: Topic) -> RepoResult<TopicId, TopicRepoError> {
        let mut store = self.store(TopicRepoError::Create)?;
        let topic_id = topic.topic_id.clone();
        store.topics.push(topic);
        Ok(topic_id)
    }

    async fn update(&self, topic_id: &TopicId, patch: PatchTopic) -> RepoResult<u64, TopicRepoError> {
        let mut store = self.store(TopicRepoError::Update)?;
        let Some(topic) = store.topics.iter_mut().find(|t| &t.topic_id == topic_id) else {
            return Ok(0);
        };
        if let Some(title) = patch.title {
            topic.title = title;
        }
        if let Field::Present(body) = patch.body {
            topic.body = body;
        }
        if patch.updated.is_some() {
            topic.updated = patch.updated;
        }
        Ok(1)
    }

    async fn delete(&self, topic_id: &TopicId) -> RepoResult<u64, TopicRepoError> {
        let mut store = self.store(TopicRepoError::Delete)?;
        let before = store.topics.len();
        store.topics.retain(|t| &t.topic_id != topic_id);
        Ok((before - store.topics.len()) as u64)
    }
}

pub struct InMemoryComments(Arc<Mutex<Store>>);

impl InMemoryComments {
    fn store(
        &self,
        fail_with: CommentRepoError,
    ) -> RepoResult<MutexGuard<'_, Store>, CommentRepoError> {
        let store = self.0.lock().unwrap();
        if store.unavailable {
            return Err(Report::new(fail_with));
        }
        Ok(store)
    }
}

fn is_comment(comment: &Comment, topic_id: &TopicId, comment_id: &CommentId) -> bool {
    &comment.topic_id == topic_id && &comment.comment_id == comment_id
}

impl CommentRepository for InMemoryComments {
    async fn find_by_topic(
        &self,
        topic_id: &TopicId,
        skip: u64,
        limit: u64,
    ) -> RepoResult<Vec<Comment>, CommentRepoError> {
        let store = self.store(CommentRepoError::FindByTopic)?;
        Ok(page(
            store.comments.iter().filter(|c| &c.topic_id == topic_id).cloned(),
            skip,
            limit,
        ))
    }

    async fn get(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> OptRepoResult<Comment, CommentRepoError> {
        let store = self.store(CommentRepoError::Get)?;
        Ok(store
            .comments
            .iter()
            .find(|c| is_comment(c, topic_id, comment_id))
            .cloned())
    }

    async fn create(&self, comment: Comment) -> RepoResult<CommentId, CommentRepoError> {
        let mut store = self.store(CommentRepoError::Create)?;
        store.comment_writes += 1;
        if store
            .comments
            .iter()
            .any(|c| c.comment_id == comment.comment_id)
        {
            return Err(Report::new(CommentRepoError::DuplicateId));
        }
        let comment_id = comment.comment_id.clone();
        store.comments.push(comment);
        Ok(comment_id)
    }

    async fn update(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
        patch: CommentPatch,
    ) -> RepoResult<u64, CommentRepoError> {
        let mut store = self.store(CommentRepoError::Update)?;
        store.comment_writes += 1;
        let Some(comment) = store
            .comments
            .iter_mut()
            .find(|c| is_comment(c, topic_id, comment_id))
        else {
            return Ok(0);
        };
        if let Some(content) = patch.content {
            comment.content = content;
        }
        if patch.updated.is_some() {
            comment.updated = patch.updated;
        }
        Ok(1)
    }

    async fn delete(
        &self,
        topic_id: &TopicId,
        comment_id: &CommentId,
    ) -> RepoResult<u64, CommentRepoError> {
        let mut store = self.store(CommentRepoError::Delete)?;
        store.comment_writes += 1;
        let before = store.comments.len();
        store.comments.retain(|c| !is_comment(c, topic_id, comment_id));
        Ok((before - store.comments.len()) as u64)
    }
}

/// A comment stored directly under `topic_id`, bypassing the usecase.
pub fn stored_comment(topic_id: &TopicId, content: &str) -> Comment {
    Comment {
        comment_id: CommentId::generate(),
        topic_id: topic_id.clone(),
        reply_comment_id: None,
        content: content.to_string(),
        username: "bob".to_string(),
        created: Utc::now(),
        updated: None,
    }
}
