//! # Modification Item REST API
//!
//! Transport-independent request handling: the route table, per-operation
//! validation and store calls, and the JSON response envelopes.

pub mod errors;
pub mod handler;
pub mod request;
pub mod response;
pub mod router;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use handler::ItemService;
pub use request::ApiRequest;
pub use response::{ApiResponse, ItemResponse, ListResponse, MessageResponse, ResponseBody};
pub use router::{Operation, Route, ROUTES};
