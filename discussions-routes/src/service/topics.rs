use crate::error::TopicServiceError;
use crate::{OptServiceResult, ServiceResult};
use chrono::Utc;
use discussions_core::id::TopicId;
use discussions_core::model::{NewTopic, PatchTopic, Topic};
use discussions_core::search::TopicSearch;
use discussions_core::{DiscussionEngine, TopicRepository};
use error_stack::ResultExt;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct TopicService<E> {
    engine: E,
}

impl<E: DiscussionEngine> TopicService<E> {
    pub fn new(engine: E) -> Self {
        TopicService { engine }
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, skip: u64, limit: u64) -> ServiceResult<Vec<Topic>, TopicServiceError> {
        self.engine
            .topics()
            .find(skip, limit)
            .await
            .change_context(TopicServiceError)
    }

    #[instrument(skip_all, name = "service#search")]
    pub async fn search(&self, search: TopicSearch) -> ServiceResult<Vec<Topic>, TopicServiceError> {
        self.engine
            .topics()
            .search(search)
            .await
            .change_context(TopicServiceError)
    }

    #[instrument(skip_all, name = "service#get")]
    pub async fn get(&self, topic_id: &TopicId) -> OptServiceResult<Topic, TopicServiceError> {
        self.engine
            .topics()
            .get(topic_id)
            .await
            .change_context(TopicServiceError)
    }

    #[instrument(skip_all, name = "service#create")]
    pub async fn create(&self, new_topic: NewTopic) -> ServiceResult<Topic, TopicServiceError> {
        let topics = self.engine.topics();
        let topic_id = topics
            .create(Topic::create(new_topic))
            .await
            .change_context(TopicServiceError)?;

        topics
            .get(&topic_id)
            .await
            .change_context(TopicServiceError)?
            .ok_or(TopicServiceError)
            .attach_with(|| format!("created topic {topic_id} could not be read back"))
    }

    #[instrument(skip_all, name = "service#update")]
    pub async fn update(
        &self,
        topic_id: &TopicId,
        patch: PatchTopic,
    ) -> OptServiceResult<Topic, TopicServiceError> {
        let topics = self.engine.topics();
        if patch.is_empty() {
            debug!("no topic fields to update, returning the stored topic");
        } else {
            topics
                .update(topic_id, patch.touched(Utc::now()))
                .await
                .change_context(TopicServiceError)?;
        }

        topics.get(topic_id).await.change_context(TopicServiceError)
    }

    /// Comments of a removed topic are left in place.
    #[instrument(skip_all, name = "service#delete")]
    pub async fn delete(&self, topic_id: &TopicId) -> ServiceResult<bool, TopicServiceError> {
        let removed = self
            .engine
            .topics()
            .delete(topic_id)
            .await
            .change_context(TopicServiceError)?;

        Ok(removed == 1)
    }
}
