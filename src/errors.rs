use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dashboard::NotReady;
use crate::models::{InvalidPageSize, UnknownCategory};

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: ApiError,
}

impl AppError {
    fn new(status: StatusCode, code: &str, message: String) -> Self {
        Self {
            status,
            body: ApiError {
                code: code.into(),
                message,
                details: None,
            },
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.into())
    }

    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "NOT_READY", msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg.into())
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.body.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<NotReady> for AppError {
    fn from(err: NotReady) -> Self {
        match err {
            NotReady::Loading => Self::not_ready("Dashboard data is still loading"),
            NotReady::Failed(message) => Self::service_unavailable(message),
        }
    }
}

impl From<InvalidPageSize> for AppError {
    fn from(err: InvalidPageSize) -> Self {
        Self::bad_request(err.to_string()).with_details(serde_json::json!({ "allowed": [5, 10, 25, 50] }))
    }
}

impl From<UnknownCategory> for AppError {
    fn from(err: UnknownCategory) -> Self {
        Self::bad_request(err.to_string()).with_details(serde_json::json!({ "allowed": ["ec2", "rds", "ebs", "logs"] }))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", err);
        Self::internal(err.to_string())
    }
}
