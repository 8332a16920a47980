/**
 * Success Responses
 *
 * Handlers return `ApiResult<Reply<T>>`. `Reply` wraps the payload in the
 * success envelope with the chosen status code.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::shared::envelope::{ApiResponse, Empty};

#[derive(Debug)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: ApiResponse<T>,
}

impl<T> Reply<T> {
    /// 200 with payload
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ApiResponse::new(message, data),
        }
    }

    /// 201 with payload
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: ApiResponse::new(message, data),
        }
    }
}

impl Reply<Empty> {
    /// 200 with an empty object as payload
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(Empty {}, message)
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
