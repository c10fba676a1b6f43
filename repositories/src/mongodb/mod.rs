use bson::{Document, doc};
use discussions_core::model::DiscussionType;
use error_stack::{Report, ResultExt};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::sync::Arc;
use tracing::debug;

pub mod comments;
pub mod topics;

pub use comments::CommentRepo;
pub use topics::TopicRepo;

use comments::TOPIC_FIELD;
use topics::{BODY_FIELD, TITLE_FIELD};

pub const DEFAULT_DB_NAME: &str = "discussions";
pub const DEFAULT_COLLECTION_NAME: &str = "discussions";

const ID_FIELD: &str = "_id";
const TYPE_FIELD: &str = "type";
const TOPIC_TEXT_INDEX_NAME: &str = "topic_text";

pub enum ConnectionDetails {
    Url(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to create client connection to mongodb instance")]
pub struct ConnectError;

#[derive(Debug, thiserror::Error)]
#[error("failed to create indexes on the discussions collection")]
pub struct IndexError;

/// Topics and comments share one collection. Each repository handed out from here
/// only ever reads and writes documents of its own kind.
#[derive(Debug, Clone)]
pub struct DiscussionStore {
    db: Database,
    collection_name: Arc<str>,
}

impl DiscussionStore {
    pub fn new(client: Client, db_name: &str, collection_name: &str) -> Self {
        Self {
            db: client.database(db_name),
            collection_name: collection_name.into(),
        }
    }

    pub async fn init(
        connection_details: ConnectionDetails,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, Report<ConnectError>> {
        let client = match connection_details {
            ConnectionDetails::Url(url) => Client::with_uri_str(url)
                .await
                .change_context(ConnectError)?,
        };

        Ok(Self::new(client, db_name, collection_name))
    }

    /// Creates the text index topic search relies on, and an index for listing comments by topic.
    pub async fn ensure_indexes(&self) -> Result<(), Report<IndexError>> {
        let collection = self.db.collection::<Document>(&self.collection_name);

        collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { TITLE_FIELD: "text", BODY_FIELD: "text" })
                    .options(
                        IndexOptions::builder()
                            .name(TOPIC_TEXT_INDEX_NAME.to_string())
                            .build(),
                    )
                    .build(),
            )
            .await
            .change_context(IndexError)
            .attach("topic text index")?;

        collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { TYPE_FIELD: 1, TOPIC_FIELD: 1 })
                    .build(),
            )
            .await
            .change_context(IndexError)
            .attach("comment topic index")?;

        debug!("indexes ensured on {}", self.collection_name);
        Ok(())
    }

    pub fn topics(&self) -> TopicRepo {
        TopicRepo::new(self.db.clone(), Arc::clone(&self.collection_name))
    }

    pub fn comments(&self) -> CommentRepo {
        CommentRepo::new(self.db.clone(), Arc::clone(&self.collection_name))
    }
}

fn collection<T: Send + Sync>(db: &Database, name: &str) -> Collection<T> {
    db.collection::<T>(name)
}

fn kind_filter(kind: DiscussionType) -> Document {
    doc! { TYPE_FIELD: kind.as_str() }
}

/// Mongo takes limits as `i64`, and treats a limit of 0 as no limit at all.
fn mongo_limit(limit: u64) -> Option<i64> {
    i64::try_from(limit).ok()
}
