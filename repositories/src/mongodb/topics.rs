use super::{ID_FIELD, collection, kind_filter, mongo_limit};
use bson::{Bson, Document, doc};
use chrono::{DateTime, Utc};
use discussions_core::TopicRepository;
use discussions_core::id::TopicId;
use discussions_core::model::{DiscussionType, PatchTopic, Topic};
use discussions_core::result::{OptRepoResult, RepoResult, TopicRepoError};
use discussions_core::search::{TopicFilter, TopicSearch};
use error_stack::ResultExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use optional_field::Field;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

pub(crate) const TITLE_FIELD: &str = "title";
pub(crate) const BODY_FIELD: &str = "body";
const USERNAME_FIELD: &str = "username";
const UPDATED_FIELD: &str = "updated";
const SCORE_FIELD: &str = "score";

#[derive(Debug, Serialize, Deserialize)]
struct MongoTopic {
    #[serde(rename = "_id")]
    id: TopicId,
    title: String,
    body: Option<String>,
    username: String,
    #[serde(rename = "type")]
    discussion_type: DiscussionType,
    created: DateTime<Utc>,
    updated: Option<DateTime<Utc>>,
}

impl From<Topic> for MongoTopic {
    fn from(value: Topic) -> Self {
        Self {
            id: value.topic_id,
            title: value.title,
            body: value.body,
            username: value.username,
            discussion_type: DiscussionType::Topic,
            created: value.created,
            updated: value.updated,
        }
    }
}

impl From<MongoTopic> for Topic {
    fn from(value: MongoTopic) -> Self {
        Self {
            topic_id: value.id,
            title: value.title,
            body: value.body,
            username: value.username,
            created: value.created,
            updated: value.updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopicRepo {
    db: Database,
    collection_name: Arc<str>,
}

impl TopicRepo {
    pub(super) fn new(db: Database, collection_name: Arc<str>) -> Self {
        Self {
            db,
            collection_name,
        }
    }

    fn topics<T: Send + Sync>(&self) -> Collection<T> {
        collection(&self.db, &self.collection_name)
    }
}

fn topic_filter(topic_id: &TopicId) -> Document {
    let mut filter = kind_filter(DiscussionType::Topic);
    filter.insert(ID_FIELD, topic_id.as_str());
    filter
}

fn update_document(patch: PatchTopic) -> RepoResult<Document, TopicRepoError> {
    let mut update_document = Document::new();
    if let Some(title) = patch.title {
        update_document.insert(TITLE_FIELD, title);
    }

    if let Field::Present(body) = patch.body {
        match body {
            Some(b) => {
                update_document.insert(BODY_FIELD, b);
            }
            None => {
                update_document.insert(BODY_FIELD, Bson::Null);
            }
        }
    }

    if let Some(updated) = patch.updated {
        update_document.insert(
            UPDATED_FIELD,
            bson::to_bson(&updated).change_context(TopicRepoError::Update)?,
        );
    }

    Ok(update_document)
}

/// Builds the aggregation for a topic search.
///
/// With a term, matches are ranked by text score in ascending order, so the weakest
/// matches come first. Paging is applied after sorting.
fn search_pipeline(search: &TopicSearch) -> RepoResult<Vec<Document>, TopicRepoError> {
    let skip = i64::try_from(search.skip())
        .change_context(TopicRepoError::Search)
        .attach_with(|| format!("invalid skip {}", search.skip()))?;
    let limit = mongo_limit(search.limit())
        .ok_or(TopicRepoError::Search)
        .attach_with(|| format!("invalid limit {}", search.limit()))?;

    let mut conditions = vec![kind_filter(DiscussionType::Topic)];
    for filter in search.filters() {
        conditions.push(match filter {
            TopicFilter::Title(title) => doc! { TITLE_FIELD: title.as_str() },
            TopicFilter::Username(username) => doc! { USERNAME_FIELD: username.as_str() },
        });
    }

    let mut pipeline = Vec::with_capacity(5);
    match search.term() {
        Some(term) => {
            conditions.push(doc! { "$text": { "$search": term } });
            pipeline.push(doc! { "$match": { "$and": conditions } });
            pipeline.push(doc! { "$addFields": { SCORE_FIELD: { "$meta": "textScore" } } });
            pipeline.push(doc! { "$sort": { SCORE_FIELD: 1 } });
        }
        None => pipeline.push(doc! { "$match": { "$and": conditions } }),
    }
    pipeline.push(doc! { "$skip": skip });
    pipeline.push(doc! { "$limit": limit });

    Ok(pipeline)
}

impl TopicRepository for TopicRepo {
    async fn find(&self, skip: u64, limit: u64) -> RepoResult<Vec<Topic>, TopicRepoError> {
        let limit = mongo_limit(limit)
            .ok_or(TopicRepoError::Find)
            .attach_with(|| format!("invalid limit {limit}. It is too large and not supported"))?;

        let options = FindOptions::builder().skip(skip).limit(limit).build();

        self.topics::<MongoTopic>()
            .find(kind_filter(DiscussionType::Topic))
            .with_options(options)
            .await
            .change_context(TopicRepoError::Find)?
            .map(|t| t.map(From::from))
            .collect::<Result<_, _>>()
            .await
            .change_context(TopicRepoError::Find)
    }

    async fn search(&self, search: TopicSearch) -> RepoResult<Vec<Topic>, TopicRepoError> {
        // $limit rejects 0 in an aggregation
        if search.limit() == 0 {
            return Ok(vec![]);
        }

        let pipeline = search_pipeline(&search)?;
        debug!("searching topics with {pipeline:?}");

        let documents = self
            .topics::<Document>()
            .aggregate(pipeline)
            .await
            .change_context(TopicRepoError::Search)?
            .collect::<Result<Vec<_>, _>>()
            .await
            .change_context(TopicRepoError::Search)?;

        documents
            .into_iter()
            .map(|d| {
                bson::from_document::<MongoTopic>(d)
                    .map(From::from)
                    .change_context(TopicRepoError::Search)
            })
            .collect()
    }

    async fn get(&self, topic_id: &TopicId) -> OptRepoResult<Topic, TopicRepoError> {
        self.topics::<MongoTopic>()
            .find_one(topic_filter(topic_id))
            .await
            .change_context(TopicRepoError::Get)
            .map(|t| t.map(From::from))
    }

    async fn create(&self, topic: Topic) -> RepoResult<TopicId, TopicRepoError> {
        let topic = MongoTopic::from(topic);

        let result = self
            .topics::<MongoTopic>()
            .insert_one(&topic)
            .await
            .change_context(TopicRepoError::Create)?;

        result
            .inserted_id
            .as_str()
            .map(TopicId::new)
            .ok_or(TopicRepoError::Create)
            .attach_with(|| format!("inserted id for topic {} was not a string", topic.id))
    }

    async fn update(
        &self,
        topic_id: &TopicId,
        patch: PatchTopic,
    ) -> RepoResult<u64, TopicRepoError> {
        let update_document = update_document(patch)?;
        if update_document.is_empty() {
            warn!("no topic patch fields specified, nothing to update");
            return Ok(0);
        }

        debug!("updating topic {topic_id} with {update_document:?}");

        self.topics::<MongoTopic>()
            .update_one(topic_filter(topic_id), doc! { "$set": update_document })
            .await
            .change_context(TopicRepoError::Update)
            .map(|r| r.modified_count)
    }

    async fn delete(&self, topic_id: &TopicId) -> RepoResult<u64, TopicRepoError> {
        self.topics::<MongoTopic>()
            .delete_one(topic_filter(topic_id))
            .await
            .change_context(TopicRepoError::Delete)
            .map(|r| r.deleted_count)
    }
}
