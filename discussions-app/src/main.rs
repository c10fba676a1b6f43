use axum::Router;
use config::Config;
use discussions_core::DiscussionEngine;
use discussions_routes::state::DiscussionAppState;
use dotenv::dotenv;
use engine::app::{AppError, AppProperties, AppResult};
use error_stack::ResultExt;
use error_stack::fmt::ColorMode;
use repositories::mongodb::{CommentRepo, ConnectionDetails, DiscussionStore, TopicRepo};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod config;

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("discussion service shutting down"),
        Err(e) => {
            error!("discussion service exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    error_stack::Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("DISCUSSIONS_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    let env_file = dotenv();
    init_logging();

    if let Err(e) = env_file {
        warn!("failed to load .env file: {e}");
    }

    let config = Config::from_env().change_context(AppError)?;
    let routes = build_routes(&config).await?;

    engine::app::run(
        routes,
        AppProperties {
            name: "discussion service",
            port: config.port,
        },
    )
    .await
}

async fn build_routes(config: &Config) -> AppResult<Router> {
    let engine = MongoEngine {
        store: build_store(config).await?,
    };

    let state = if config.metrics_enabled {
        DiscussionAppState::new_with_metrics(engine).change_context(AppError)?
    } else {
        DiscussionAppState::new_without_metrics(engine)
    };

    debug!("building routes..");
    Ok(discussions_routes::routes::build(state)).inspect(|_| debug!("routes built"))
}

#[instrument(skip(config), fields(db = config.db_name.as_str(), collection = config.collection.as_str()))]
async fn build_store(config: &Config) -> AppResult<DiscussionStore> {
    debug!("initializing mongodb store");
    let store = DiscussionStore::init(
        ConnectionDetails::Url(config.database_url.clone()),
        &config.db_name,
        &config.collection,
    )
    .await
    .change_context(AppError)?;

    store.ensure_indexes().await.change_context(AppError)?;
    Ok(store)
}

#[derive(Debug, Clone)]
struct MongoEngine {
    store: DiscussionStore,
}

impl DiscussionEngine for MongoEngine {
    type Topics = TopicRepo;
    type Comments = CommentRepo;

    fn topics(&self) -> Self::Topics {
        self.store.topics()
    }

    fn comments(&self) -> Self::Comments {
        self.store.comments()
    }
}
