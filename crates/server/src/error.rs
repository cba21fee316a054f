//! Error types and HTTP error responses for the JSON API

use aqi_lib::{AqiError, InputError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    /// A pollutant value was rejected
    InvalidInput(InputError),
    /// The scaler or model failed on a valid reading
    Prediction(AqiError),
    /// The request body could not be deserialized
    BadRequest(String),
}

/// JSON body returned on error
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, field) = match &self {
            ApiError::InvalidInput(e) => (e.to_string(), Some(e.field().key())),
            ApiError::Prediction(e) => (format!("Could not predict AQI: {}", e), None),
            ApiError::BadRequest(msg) => (msg.clone(), None),
        };

        let body = ErrorBody {
            error: message,
            code: status.as_u16(),
            field,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::InvalidInput(e)
    }
}

impl From<AqiError> for ApiError {
    fn from(e: AqiError) -> Self {
        ApiError::Prediction(e)
    }
}
