//! # HTTP Server Module
//!
//! Serves the modification item API over HTTP.
//!
//! # Endpoints
//!
//! - `GET|POST|PUT|DELETE /items` - List, create, update, delete items
//! - `GET /items/for-sync` - Items not yet linked to an issue
//! - `POST /items/mark-linked` - Record the issue an item was linked to

pub mod config;
pub mod cors;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{app, HttpServer};
