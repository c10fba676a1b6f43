use crate::error::MetricsError;
use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::IntoResponse;
use error_stack::{Report, ResultExt};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::time::Instant;

const TOPICS_RETRIEVED_METRIC_NAME: &str = "topics_retrieved";
const TOPICS_CREATED_METRIC_NAME: &str = "num_topics_created";
const TOPICS_UPDATED_METRIC_NAME: &str = "num_topics_updated";
const TOPICS_DELETED_METRIC_NAME: &str = "num_topics_deleted";

const COMMENTS_RETRIEVED_METRIC_NAME: &str = "comments_retrieved";
const COMMENTS_CREATED_METRIC_NAME: &str = "num_comments_created";
const COMMENTS_UPDATED_METRIC_NAME: &str = "num_comments_updated";
const COMMENTS_DELETED_METRIC_NAME: &str = "num_comments_deleted";

const REQUESTS_TOTAL_METRIC_NAME: &str = "http_requests_total";
const REQUEST_DURATION_METRIC_NAME: &str = "http_requests_duration_seconds";
const REQUEST_SIZE_METRIC_NAME: &str = "http_request_size";

/// Installs the global prometheus recorder. Only one can exist per process.
pub fn setup_recorder() -> Result<PrometheusHandle, Report<MetricsError>> {
    const EXPONENTIAL_SECONDS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

    const REQ_RES_BUCKETS: &[f64] = &[128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_METRIC_NAME.to_string()),
            EXPONENTIAL_SECONDS,
        )
        .change_context(MetricsError)?
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_SIZE_METRIC_NAME.to_string()),
            REQ_RES_BUCKETS,
        )
        .change_context(MetricsError)?
        .install_recorder()
        .change_context(MetricsError)
}

pub async fn track_http(req: Request, next: Next) -> impl IntoResponse {
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        req.uri().path().to_owned()
    };

    if path.ends_with("metrics") {
        return next.run(req).await;
    }

    let method = req.method().clone();

    let req_size = req
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok());

    if let Some(req_size) = req_size {
        metrics::histogram!(REQUEST_SIZE_METRIC_NAME).record(req_size);
    }

    let start = Instant::now();
    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method.to_string()),
        ("path", path),
        ("status", status),
    ];

    metrics::counter!(REQUESTS_TOTAL_METRIC_NAME, &labels).increment(1);
    metrics::histogram!(REQUEST_DURATION_METRIC_NAME, &labels).record(latency);

    response
}

fn as_count(amt: usize) -> u64 {
    u64::try_from(amt).unwrap_or(u64::MAX)
}

#[inline]
pub fn increment_topics_retrieved_by(amt: usize) {
    metrics::counter!(TOPICS_RETRIEVED_METRIC_NAME).increment(as_count(amt));
}

#[inline]
pub fn increment_topics_created() {
    metrics::counter!(TOPICS_CREATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_topics_updated() {
    metrics::counter!(TOPICS_UPDATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_topics_deleted() {
    metrics::counter!(TOPICS_DELETED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_comments_retrieved_by(amt: usize) {
    metrics::counter!(COMMENTS_RETRIEVED_METRIC_NAME).increment(as_count(amt));
}

#[inline]
pub fn increment_comments_created() {
    metrics::counter!(COMMENTS_CREATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_comments_updated() {
    metrics::counter!(COMMENTS_UPDATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_comments_deleted() {
    metrics::counter!(COMMENTS_DELETED_METRIC_NAME).increment(1);
}
