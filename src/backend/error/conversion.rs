/**
 * Error Conversion
 *
 * Converts `BackendError` into the JSON error envelope:
 *
 * ```json
 * { "success": false, "message": "...", "errors": [], "data": null }
 * ```
 *
 * Internal errors are logged here so handlers can propagate them with `?`.
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;
use crate::shared::ApiErrorBody;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_internal() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ApiErrorBody::new(self.message(), self.details());
        (status, Json(body)).into_response()
    }
}
