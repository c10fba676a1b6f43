use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_streams::StreamBodyAs;
use serde::Serialize;
use std::marker::PhantomData;

/// Can be used as the return type of an endpoint where
/// a transform needs to be done on an existing collection.
/// Elements are serialized into a JSON array as they are streamed back,
/// so no intermediate collection of the response type is built.
#[derive(Debug)]
pub struct StreamingResponse<T> {
    status_code: StatusCode,
    stream: StreamBodyAs<'static>,
    _phantom: PhantomData<T>,
}

impl<T> StreamingResponse<T>
where
    T: Serialize + Send + Sync + 'static,
{
    pub fn ok<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + Sync + 'static,
    {
        Self::new(StatusCode::OK, iter)
    }

    pub fn new<I>(status_code: StatusCode, iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + Sync + 'static,
    {
        let stream = tokio_stream::iter(iter);
        Self {
            status_code,
            stream: StreamBodyAs::json_array(stream),
            _phantom: PhantomData,
        }
    }
}

impl<T> IntoResponse for StreamingResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, self.stream).into_response()
    }
}
