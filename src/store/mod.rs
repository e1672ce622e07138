//! # Item Store
//!
//! Parameterized SQL access to the `modifications` table. The REST layer only
//! sees the [`ItemStore`] trait; [`SqliteItemStore`] is the production
//! implementation.

mod errors;
pub mod schema;
mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use sqlite::SqliteItemStore;

use crate::model::{Deadline, ItemStatus, ModificationItem};

/// Statement-level access to stored items
///
/// Every method is a single statement. Rows are decoded into
/// [`ModificationItem`]s; a row that fails to decode yields
/// [`StoreError::Decode`] and no partial result.
pub trait ItemStore: Send + Sync {
    /// Insert a new unlinked item, returning the assigned id
    fn insert(
        &self,
        title: &str,
        status: ItemStatus,
        deadline: Deadline,
        details: Option<&str>,
    ) -> StoreResult<u64>;

    /// All items, newest first, full column set
    fn query_all(&self) -> StoreResult<Vec<ModificationItem>>;

    /// Unlinked items with the restricted sync column set
    /// (no status, link status or issue number)
    fn query_unlinked(&self) -> StoreResult<Vec<ModificationItem>>;

    /// Overwrite the editable fields of one item, returning rows affected
    fn update(
        &self,
        id: u64,
        title: &str,
        status: ItemStatus,
        deadline: Deadline,
        details: Option<&str>,
    ) -> StoreResult<usize>;

    /// Remove one item, returning rows affected
    fn delete(&self, id: u64) -> StoreResult<usize>;

    fn exists(&self, id: u64) -> StoreResult<bool>;

    /// Set the item linked with the given issue number, returning rows affected
    fn mark_linked(&self, id: u64, issue_number: &str) -> StoreResult<usize>;
}
