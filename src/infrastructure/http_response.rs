// HTTP response utilities for file downloads and error mapping
use crate::domain::error::GatewayError;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
    response::IntoResponse,
    Json,
};

/// Wrap CSV text as a download with the given file name
pub fn csv_attachment_response(csv: String, file_name: &str) -> Result<Response<Body>, StatusCode> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .map_err(|e| {
            tracing::error!("Invalid download file name {:?}: {}", file_name, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, csv.len())
        .body(Body::from(csv))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::UnknownControl(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidReading { .. }
            | GatewayError::InvalidPower(_)
            | GatewayError::InvalidTariff(_)
            | GatewayError::UnknownMode(_)
            | GatewayError::UnknownMetric(_) => StatusCode::BAD_REQUEST,
            GatewayError::Publish { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::CoordinatorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
