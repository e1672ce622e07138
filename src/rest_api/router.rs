//! # Route Table
//!
//! Exact-path, exact-method dispatch. A path that is not in the table is
//! `404 Not found`; a known path with an unlisted method is
//! `405 Method not allowed`. There is no wildcard or prefix matching.

use axum::http::Method;

use super::errors::{ApiError, ApiResult};

/// Operations exposed over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListItems,
    CreateItem,
    UpdateItem,
    DeleteItem,
    ListForSync,
    MarkLinked,
}

/// One row of the route table
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub method: Method,
    pub operation: Operation,
}

pub const ITEMS_PATH: &str = "/items";
pub const FOR_SYNC_PATH: &str = "/items/for-sync";
pub const MARK_LINKED_PATH: &str = "/items/mark-linked";

pub const ROUTES: &[Route] = &[
    Route {
        path: ITEMS_PATH,
        method: Method::GET,
        operation: Operation::ListItems,
    },
    Route {
        path: ITEMS_PATH,
        method: Method::POST,
        operation: Operation::CreateItem,
    },
    Route {
        path: ITEMS_PATH,
        method: Method::PUT,
        operation: Operation::UpdateItem,
    },
    Route {
        path: ITEMS_PATH,
        method: Method::DELETE,
        operation: Operation::DeleteItem,
    },
    Route {
        path: FOR_SYNC_PATH,
        method: Method::GET,
        operation: Operation::ListForSync,
    },
    Route {
        path: MARK_LINKED_PATH,
        method: Method::POST,
        operation: Operation::MarkLinked,
    },
];

/// Resolve a request line to an operation
pub fn resolve(method: &Method, path: &str) -> ApiResult<Operation> {
    let mut known_path = false;

    for route in ROUTES.iter().filter(|r| r.path == path) {
        known_path = true;
        if route.method == *method {
            return Ok(route.operation);
        }
    }

    if known_path {
        Err(ApiError::MethodNotAllowed)
    } else {
        Err(ApiError::not_found("Not found"))
    }
}
