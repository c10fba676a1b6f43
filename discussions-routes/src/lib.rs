use error_stack::Report;

pub type ServiceResult<T, E> = Result<T, Report<E>>;
pub type OptServiceResult<T, E> = Result<Option<T>, Report<E>>;

pub mod error;
mod metrics;
pub mod routes;
pub mod service;
pub mod state;

#[cfg(test)]
mod tests;
