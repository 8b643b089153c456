pub mod devices;
pub mod pages;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::registry::{NotFoundError, RegistryFullError, ValidationError};
use crate::AppState;

/// Error response - `{"error": "message"}`, plus per-field messages for
/// validation failures
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

/// API error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    fields: Option<BTreeMap<String, String>>,
}

impl ApiError {
    fn with_status(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            fields: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    /// 404 with the `no <resource>` body clients match on
    pub fn not_found(resource: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, format!("no {}", resource))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_GATEWAY, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn validation(err: &ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
            fields: Some(err.fields.clone()),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                fields: self.fields,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Typed registry errors first (no fragile string matching)
        if let Some(nf) = err.downcast_ref::<NotFoundError>() {
            return Self::not_found(&nf.resource);
        }
        if let Some(invalid) = err.downcast_ref::<ValidationError>() {
            return Self::validation(invalid);
        }
        if let Some(full) = err.downcast_ref::<RegistryFullError>() {
            return Self::conflict(full.to_string());
        }
        Self::internal(format!("{:#}", err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(&ValidationError::field("body", rejection.body_text()))
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Response helper: return 201 Created with JSON body
pub fn created<T: Serialize>(item: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(item))
}

/// Healthcheck endpoint - returns 200 OK with status
pub async fn healthcheck(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "device-registry",
        "devices": state.registry.count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
