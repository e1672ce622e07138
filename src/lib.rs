//! modtrack - modification item tracker
//!
//! An HTTP/JSON service over a single SQLite table of tracked change
//! requests, with endpoints an issue-tracker integration uses to pick up
//! unlinked items and record the issue each one was linked to.

pub mod cli;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod rest_api;
pub mod store;
