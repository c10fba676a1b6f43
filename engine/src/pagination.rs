use serde::Deserialize;
use utoipa::ToSchema;

/// Offset based paging, taken from the `skip` and `limit` query parameters.
/// Callers own the cursor; nothing is kept between requests.
#[derive(Debug, Deserialize, ToSchema, PartialEq, Eq, Clone, Copy, Default)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn limit_or(&self, default_limit: u64) -> u64 {
        self.limit.unwrap_or(default_limit)
    }
}
