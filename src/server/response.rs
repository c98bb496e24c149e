use crate::utils::error::ConvertError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Boundary wrapper turning [`ConvertError`] into a JSON `{ "error": ... }` response.
#[derive(Debug)]
pub struct ApiError(pub ConvertError);

impl From<ConvertError> for ApiError {
    fn from(error: ConvertError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                category = ?self.0.category(),
                severity = ?self.0.severity(),
                "Conversion error: {}",
                self.0
            );
        }

        (
            status,
            Json(ErrorBody {
                error: self.0.client_message(),
            }),
        )
            .into_response()
    }
}
