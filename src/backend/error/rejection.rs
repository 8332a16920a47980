/**
 * Extractor Rejections
 *
 * Wrappers around axum's `Json`, `Path` and `Query` extractors whose rejections are
 * reported through the standard error envelope as 400 responses.
 */

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::backend::error::types::BackendError;

/// JSON body extractor with envelope rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BackendError))]
pub struct ApiJson<T>(pub T);

/// Path extractor with envelope rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(BackendError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor with envelope rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BackendError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected JSON body");
        BackendError::bad_request("Invalid JSON body").with_errors(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        BackendError::bad_request("Invalid path parameter").with_errors(vec![rejection.body_text()])
    }
}

impl From<QueryRejection> for BackendError {
    fn from(rejection: QueryRejection) -> Self {
        BackendError::bad_request("Invalid query parameter").with_errors(vec![rejection.body_text()])
    }
}
