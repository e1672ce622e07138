//! SQLite-backed item store

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row};

use crate::model::{Deadline, ItemStatus, LinkStatus, ModificationItem};

use super::errors::{StoreError, StoreResult};
use super::schema;
use super::ItemStore;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Item store over a single mutex-guarded SQLite connection
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Open (creating if needed) the database file and migrate its schema
    pub fn open(path: &Path) -> StoreResult<Self> {
        let open_error = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(open_error)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;").map_err(open_error)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_error)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by tests and ephemeral runs
    pub fn open_in_memory() -> StoreResult<Self> {
        let open_error = |source| StoreError::Open {
            path: ":memory:".into(),
            source,
        };
        let conn = Connection::open_in_memory().map_err(open_error)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_error)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Current `user_version` of the database
    pub fn schema_version(&self) -> StoreResult<i64> {
        let conn = self.conn()?;
        let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// SQLite integers are signed; ids beyond `i64::MAX` cannot name a row
fn sql_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn decode_id(row: &Row<'_>) -> rusqlite::Result<u64> {
    let id: i64 = row.get(0)?;
    u64::try_from(id).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, id))
}

fn decode_item(row: &Row<'_>) -> rusqlite::Result<ModificationItem> {
    Ok(ModificationItem {
        id: decode_id(row)?,
        title: row.get(1)?,
        status: Some(row.get(2)?),
        deadline: row.get(3)?,
        link_status: Some(row.get(4)?),
        issue_number: row.get(5)?,
        details: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

fn decode_sync_item(row: &Row<'_>) -> rusqlite::Result<ModificationItem> {
    Ok(ModificationItem {
        id: decode_id(row)?,
        title: row.get(1)?,
        status: None,
        deadline: row.get(2)?,
        link_status: None,
        issue_number: String::new(),
        details: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

impl ItemStore for SqliteItemStore {
    fn insert(
        &self,
        title: &str,
        status: ItemStatus,
        deadline: Deadline,
        details: Option<&str>,
    ) -> StoreResult<u64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO modifications (title, status, deadline, link_status, issue_number, details)
             VALUES (?1, ?2, ?3, ?4, '', ?5)",
            params![title, status, deadline, LinkStatus::Unlinked, details],
        )?;

        let rowid = conn.last_insert_rowid();
        u64::try_from(rowid).map_err(|_| StoreError::RowId(rowid))
    }

    fn query_all(&self) -> StoreResult<Vec<ModificationItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, status, deadline, link_status, issue_number, details
             FROM modifications
             ORDER BY id DESC",
        )?;
        let items = stmt
            .query_map([], decode_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn query_unlinked(&self) -> StoreResult<Vec<ModificationItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, deadline, details
             FROM modifications
             WHERE link_status = ?1
             ORDER BY id ASC",
        )?;
        let items = stmt
            .query_map([LinkStatus::Unlinked], decode_sync_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn update(
        &self,
        id: u64,
        title: &str,
        status: ItemStatus,
        deadline: Deadline,
        details: Option<&str>,
    ) -> StoreResult<usize> {
        let Some(id) = sql_id(id) else {
            return Ok(0);
        };
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE modifications
             SET title = ?1, status = ?2, deadline = ?3, details = ?4
             WHERE id = ?5",
            params![title, status, deadline, details, id],
        )?;
        Ok(affected)
    }

    fn delete(&self, id: u64) -> StoreResult<usize> {
        let Some(id) = sql_id(id) else {
            return Ok(0);
        };
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM modifications WHERE id = ?1", [id])?;
        Ok(affected)
    }

    fn exists(&self, id: u64) -> StoreResult<bool> {
        let Some(id) = sql_id(id) else {
            return Ok(false);
        };
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM modifications WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn mark_linked(&self, id: u64, issue_number: &str) -> StoreResult<usize> {
        let Some(id) = sql_id(id) else {
            return Ok(0);
        };
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE modifications
             SET link_status = ?1, issue_number = ?2
             WHERE id = ?3",
            params![LinkStatus::Linked, issue_number, id],
        )?;
        Ok(affected)
    }
}

// ==================
// Column conversions
// ==================

impl ToSql for ItemStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ItemStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for LinkStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for LinkStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Deadline {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Deadline {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteItemStore {
        SqliteItemStore::open_in_memory().unwrap()
    }

    fn deadline(s: &str) -> Deadline {
        s.parse().unwrap()
    }

    fn insert(store: &SqliteItemStore, title: &str) -> u64 {
        store
            .insert(title, ItemStatus::NotStarted, deadline("2024-06-01"), None)
            .unwrap()
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = store();
        let a = insert(&store, "a");
        let b = insert(&store, "b");
        assert!(b > a);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = store();
        let a = insert(&store, "a");
        let b = insert(&store, "b");
        assert_eq!(store.delete(b).unwrap(), 1);
        let c = insert(&store, "c");
        assert!(c > b && b > a);
    }

    #[test]
    fn test_query_all_newest_first_with_defaults() {
        let store = store();
        insert(&store, "first");
        store
            .insert(
                "second",
                ItemStatus::NotStarted,
                deadline("2024-07-01"),
                Some("notes"),
            )
            .unwrap();

        let items = store.query_all().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "second");
        assert_eq!(items[0].details, "notes");
        assert_eq!(items[1].title, "first");
        assert_eq!(items[1].details, "");
        assert_eq!(items[1].link_status, Some(LinkStatus::Unlinked));
        assert_eq!(items[1].issue_number, "");
    }

    #[test]
    fn test_mark_linked_and_unlinked_query() {
        let store = store();
        let a = insert(&store, "a");
        let b = insert(&store, "b");

        assert!(store.exists(a).unwrap());
        assert_eq!(store.mark_linked(a, "#12").unwrap(), 1);

        let unlinked = store.query_unlinked().unwrap();
        assert_eq!(unlinked.len(), 1);
        assert_eq!(unlinked[0].id, b);
        assert_eq!(unlinked[0].status, None);
        assert_eq!(unlinked[0].link_status, None);

        let all = store.query_all().unwrap();
        let linked = all.iter().find(|i| i.id == a).unwrap();
        assert_eq!(linked.link_status, Some(LinkStatus::Linked));
        assert_eq!(linked.issue_number, "#12");
    }

    #[test]
    fn test_update_leaves_link_fields() {
        let store = store();
        let a = insert(&store, "a");
        store.mark_linked(a, "#3").unwrap();

        let affected = store
            .update(a, "renamed", ItemStatus::Done, deadline("2025-01-01"), Some("x"))
            .unwrap();
        assert_eq!(affected, 1);

        let item = store.query_all().unwrap().remove(0);
        assert_eq!(item.title, "renamed");
        assert_eq!(item.status, Some(ItemStatus::Done));
        assert_eq!(item.link_status, Some(LinkStatus::Linked));
        assert_eq!(item.issue_number, "#3");
    }

    #[test]
    fn test_missing_ids_affect_nothing() {
        let store = store();
        assert!(!store.exists(42).unwrap());
        assert_eq!(store.delete(42).unwrap(), 0);
        assert_eq!(store.mark_linked(42, "#1").unwrap(), 0);
        assert_eq!(
            store
                .update(42, "t", ItemStatus::Done, deadline("2024-01-01"), None)
                .unwrap(),
            0
        );

        // Beyond the signed range
        assert!(!store.exists(u64::MAX).unwrap());
        assert_eq!(store.delete(u64::MAX).unwrap(), 0);
    }

    #[test]
    fn test_corrupt_row_is_decode_error() {
        let store = store();
        insert(&store, "ok");
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO modifications (title, status, deadline) \
                 VALUES ('bad', 'archived', '2024-01-01')",
                [],
            )
            .unwrap();

        let err = store.query_all().unwrap_err();
        assert!(err.is_decode(), "{err}");
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("items.sqlite3");

        let id = {
            let store = SqliteItemStore::open(&path).unwrap();
            insert(&store, "persisted")
        };

        let store = SqliteItemStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), schema::SCHEMA_VERSION);
        assert!(store.exists(id).unwrap());
    }

    #[test]
    fn test_connection_setup_failure_is_open_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("not-a-database.sqlite3");
        std::fs::write(&path, vec![0xA5u8; 4096]).unwrap();

        let err = SqliteItemStore::open(&path).err().unwrap();
        assert!(matches!(err, StoreError::Open { .. }), "{err}");
    }
}
