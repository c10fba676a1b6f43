use utoipa::PartialSchema;
use utoipa::openapi::{RefOr, Schema};

pub mod app;
pub mod error;
mod pagination;
pub use pagination::Pagination;
pub mod stream;

/// Schema for a patch field that may be omitted, set to a value, or set to null.
pub fn patch_field_schema() -> impl Into<RefOr<Schema>> {
    <Option<String> as PartialSchema>::schema()
}
