//! # Response Formatting
//!
//! Handlers return an [`ApiResponse`]: a status code and a typed body.
//! Conversion to HTTP happens once, in its `IntoResponse` impl.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::model::ModificationItem;

use super::errors::{ApiError, ErrorResponse};

/// Single item envelope (create, update)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResponse {
    pub modification_item: ModificationItem,
}

/// Item list envelope (list, list for sync)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResponse {
    pub modifications: Vec<ModificationItem>,
}

/// Plain confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Typed response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Item(ItemResponse),
    List(ListResponse),
    Message(MessageResponse),
    Error(ErrorResponse),
    Empty,
}

impl ResponseBody {
    /// Serialize to JSON bytes; `None` for an empty body
    pub fn encode(&self) -> serde_json::Result<Option<Vec<u8>>> {
        match self {
            ResponseBody::Item(body) => serde_json::to_vec(body).map(Some),
            ResponseBody::List(body) => serde_json::to_vec(body).map(Some),
            ResponseBody::Message(body) => serde_json::to_vec(body).map(Some),
            ResponseBody::Error(body) => serde_json::to_vec(body).map(Some),
            ResponseBody::Empty => Ok(None),
        }
    }
}

/// Structured handler result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn item(status: StatusCode, item: ModificationItem) -> Self {
        Self {
            status,
            body: ResponseBody::Item(ItemResponse {
                modification_item: item,
            }),
        }
    }

    pub fn list(items: Vec<ModificationItem>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::List(ListResponse {
                modifications: items,
            }),
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Message(MessageResponse {
                message: msg.into(),
            }),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: ResponseBody::Empty,
        }
    }

    /// Body as a JSON value, `Null` when empty
    pub fn json(&self) -> serde_json::Value {
        match self.body.encode() {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_default(),
            _ => serde_json::Value::Null,
        }
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        Self {
            status: err.status_code(),
            body: ResponseBody::Error(ErrorResponse::from(err)),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        match self.body.encode() {
            Ok(Some(bytes)) => (
                status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                bytes,
            )
                .into_response(),
            Ok(None) => status.into_response(),
            Err(err) => {
                // Status is already decided; the body cannot be recovered
                tracing::error!(status = status.as_u16(), error = %err, "failed to encode response");
                status.into_response()
            }
        }
    }
}
