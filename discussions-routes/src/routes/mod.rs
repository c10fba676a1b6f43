use crate::metrics;
use crate::state::DiscussionAppState;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use discussions_core::DiscussionEngine;
use tracing::info;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

mod comments;
mod requests;
mod responses;
mod topics;

const TOPIC_ROOT_PATH: &str = "/topics";

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = TOPIC_ROOT_PATH, api = DiscussionDocs),
    )
)]
struct ApiDoc;

#[derive(OpenApi)]
#[openapi(paths(
    topics::list_topics,
    topics::search_topics,
    topics::get_topic,
    topics::create_topic,
    topics::update_topic,
    topics::delete_topic,
    comments::list_comments,
    comments::get_comment,
    comments::create_comment,
    comments::update_comment,
    comments::delete_comment,
))]
struct DiscussionDocs;

pub fn build<E: DiscussionEngine>(app_state: DiscussionAppState<E>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes(app_state))
        .split_for_parts();

    router.merge(SwaggerUi::new("/topics/swagger-ui").url("/topics/api-docs/openapi.json", api))
}

fn routes<S, E: DiscussionEngine>(app_state: DiscussionAppState<E>) -> OpenApiRouter<S> {
    let main_router = OpenApiRouter::new()
        .route(
            topics::TOPIC_LIST_PATH,
            get(topics::list_topics::<E>).post(topics::create_topic::<E>),
        )
        .route(topics::TOPIC_SEARCH_PATH, get(topics::search_topics::<E>))
        .route(
            topics::TOPIC_PATH,
            get(topics::get_topic::<E>)
                .put(topics::update_topic::<E>)
                .delete(topics::delete_topic::<E>),
        )
        .route(
            comments::COMMENT_LIST_PATH,
            get(comments::list_comments::<E>).post(comments::create_comment::<E>),
        )
        .route(
            comments::COMMENT_PATH,
            get(comments::get_comment::<E>)
                .put(comments::update_comment::<E>)
                .delete(comments::delete_comment::<E>),
        );

    let router = match app_state.metrics.clone() {
        Some(recorder) => {
            info!("metrics enabled, setting up metrics handler");
            main_router
                .route("/metrics", get(|| async move { recorder.render() }))
                .route_layer(middleware::from_fn(metrics::track_http))
        }
        None => {
            info!("metrics not enabled, setting up service unavailable metrics handler");
            main_router.route(
                "/metrics",
                get(|| async {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Metrics endpoint is disabled. Metrics must be enabled and the service restarted",
                    )
                }),
            )
        }
    };

    OpenApiRouter::new()
        .nest(TOPIC_ROOT_PATH, router)
        .with_state(app_state)
}
