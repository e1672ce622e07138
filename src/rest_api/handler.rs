//! # Item Service
//!
//! Translates routed requests into store calls and shapes the results.
//! Each operation validates its input completely before touching the store
//! and converts every store failure into a fixed 500 message.

use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::model::{ItemPayload, MarkLinkedRequest, ModificationItem, StatusPolicy};
use crate::store::{ItemStore, StoreError};

use super::errors::{ApiError, ApiResult};
use super::request::ApiRequest;
use super::response::ApiResponse;
use super::router::{self, Operation};

/// Request handler over an item store
pub struct ItemService<S: ItemStore> {
    store: S,
}

impl<S: ItemStore> ItemService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Route and execute one request. Never fails: errors become error responses.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let result = router::resolve(&request.method, &request.path)
            .and_then(|operation| self.dispatch(operation, request));

        match result {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    status = err.status_code().as_u16(),
                    error = %err,
                    "request rejected"
                );
                ApiResponse::from(err)
            }
        }
    }

    fn dispatch(&self, operation: Operation, request: &ApiRequest) -> ApiResult<ApiResponse> {
        match operation {
            Operation::ListItems => self.list_items(),
            Operation::CreateItem => self.create_item(&request.body),
            Operation::UpdateItem => self.update_item(request),
            Operation::DeleteItem => self.delete_item(request),
            Operation::ListForSync => self.list_items_for_sync(),
            Operation::MarkLinked => self.mark_linked(&request.body),
        }
    }

    /// `POST /items`
    pub fn create_item(&self, body: &[u8]) -> ApiResult<ApiResponse> {
        let payload: ItemPayload = decode_body(body)?;
        let fields = payload.validate(StatusPolicy::Create)?;

        let id = self
            .store
            .insert(
                &fields.title,
                fields.status,
                fields.deadline,
                fields.details.as_deref(),
            )
            .map_err(|err| match err {
                StoreError::RowId(_) => store_failure("Failed to retrieve item ID", err),
                err => store_failure("Failed to insert data", err),
            })?;

        tracing::info!(id, "item created");
        Ok(ApiResponse::item(
            StatusCode::CREATED,
            ModificationItem::from_fields(id, fields),
        ))
    }

    /// `GET /items`
    pub fn list_items(&self) -> ApiResult<ApiResponse> {
        let items = self.store.query_all().map_err(list_failure)?;
        Ok(ApiResponse::list(items))
    }

    /// `GET /items/for-sync`
    pub fn list_items_for_sync(&self) -> ApiResult<ApiResponse> {
        let items = self.store.query_unlinked().map_err(list_failure)?;
        Ok(ApiResponse::list(items))
    }

    /// `PUT /items?id=N`
    ///
    /// The response echoes the request values. `link_status` is always
    /// reported as `unlinked` and `issue_number` as empty, even when the
    /// stored item is linked; callers must re-list to see link state.
    /// An id with no row still succeeds with zero rows affected.
    pub fn update_item(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let id = item_id(request)?;
        let payload: ItemPayload = decode_body(&request.body)?;
        let fields = payload.validate(StatusPolicy::Update)?;

        let affected = self
            .store
            .update(
                id,
                &fields.title,
                fields.status,
                fields.deadline,
                fields.details.as_deref(),
            )
            .map_err(|err| store_failure("Failed to update item", err))?;

        tracing::info!(id, affected, "item updated");
        Ok(ApiResponse::item(
            StatusCode::OK,
            ModificationItem::from_fields(id, fields),
        ))
    }

    /// `DELETE /items?id=N`, a no-op for unknown ids
    pub fn delete_item(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let id = item_id(request)?;

        let affected = self
            .store
            .delete(id)
            .map_err(|err| store_failure("Failed to delete item", err))?;

        tracing::info!(id, affected, "item deleted");
        Ok(ApiResponse::no_content())
    }

    /// `POST /items/mark-linked`
    ///
    /// Existence check and update are two separate statements. A delete
    /// landing between them leaves zero rows affected, reported as not found.
    pub fn mark_linked(&self, body: &[u8]) -> ApiResult<ApiResponse> {
        let request: MarkLinkedRequest = decode_body(body)?;
        let issue_number = request.issue_number.as_deref().unwrap_or("");

        let exists = self
            .store
            .exists(request.id)
            .map_err(|err| store_failure("Failed to check item existence", err))?;
        if !exists {
            return Err(ApiError::not_found("Item not found"));
        }

        let affected = self
            .store
            .mark_linked(request.id, issue_number)
            .map_err(|err| store_failure("Failed to update item status", err))?;
        if affected == 0 {
            tracing::warn!(id = request.id, "item removed before it could be linked");
            return Err(ApiError::not_found("Item not found"));
        }

        tracing::info!(id = request.id, issue_number, "item marked as linked");
        Ok(ApiResponse::message("Item marked as linked."))
    }
}

/// Bodies must be JSON objects; derived visitors would also map arrays by position
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let invalid = |_| ApiError::bad_request("Invalid request body");
    let object: Map<String, Value> = serde_json::from_slice(body).map_err(invalid)?;
    serde_json::from_value(Value::Object(object)).map_err(invalid)
}

/// `id` query parameter as a plain base-10 unsigned integer
fn item_id(request: &ApiRequest) -> ApiResult<u64> {
    let raw = request
        .query_param("id")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing item ID"))?;

    // u64::from_str also takes a leading '+'
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request("Invalid item ID"));
    }
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid item ID"))
}

fn store_failure(message: &str, err: StoreError) -> ApiError {
    tracing::error!(error = %err, "{message}");
    ApiError::internal(message)
}

fn list_failure(err: StoreError) -> ApiError {
    if err.is_decode() {
        store_failure("Failed to parse items", err)
    } else {
        store_failure("Failed to retrieve items", err)
    }
}
