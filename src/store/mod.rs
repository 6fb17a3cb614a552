//! SQLite-backed record store.
//!
//! Insert-only: each upload is one bulk-insert transaction, queries read
//! the whole table back in insertion order (`id ASC`). Records accumulate
//! across uploads — no dedup, no upsert, no delete.
//!
//! Dates are stored as ISO-8601 text. The store loads fine against a
//! database created before the `role` and `location` columns existed:
//! [`EmployeeStore::open`] adds them to legacy tables on startup.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::error::{StoreError, StoreResult};
use crate::models::EmployeeRecord;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        department TEXT,
        role TEXT,
        location TEXT,
        performance_score REAL,
        projects_completed INTEGER,
        sales REAL,
        customer_satisfaction REAL,
        review_date TEXT
    )
";

const SELECT_COLUMNS: &str = "
    id, name, department, role, location, performance_score,
    projects_completed, sales, customer_satisfaction, review_date
";

/// Handle to the employees table.
///
/// Constructed once at process start and threaded explicitly to callers;
/// lifecycle is process start to shutdown.
pub struct EmployeeStore {
    conn: Connection,
}

impl EmployeeStore {
    /// Open (or create) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.bootstrap()?;
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.bootstrap()?;
        Ok(store)
    }

    fn bootstrap(&self) -> StoreResult<()> {
        self.conn.execute(CREATE_TABLE, [])?;
        self.ensure_columns()?;
        Ok(())
    }

    /// Add the `role` and `location` columns to tables created before
    /// they existed.
    fn ensure_columns(&self) -> StoreResult<()> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(employees)")?;
        let existing: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        for column in ["role", "location"] {
            if !existing.iter().any(|c| c == column) {
                self.conn
                    .execute(
                        &format!("ALTER TABLE employees ADD COLUMN {} TEXT", column),
                        [],
                    )
                    .map_err(|e| {
                        StoreError::Migration(format!("adding column {}: {}", column, e))
                    })?;
            }
        }
        Ok(())
    }

    /// Bulk-insert records in a single transaction.
    ///
    /// Ids are assigned by the store; any `id` already on the records is
    /// ignored.
    pub fn insert_many(&mut self, records: &[EmployeeRecord]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO employees (
                    name, department, role, location, performance_score,
                    projects_completed, sales, customer_satisfaction, review_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.name,
                    record.department,
                    record.role,
                    record.location,
                    record.performance_score,
                    record.projects_completed,
                    record.sales,
                    record.customer_satisfaction,
                    record.review_date.map(|d| d.to_string()),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Total number of persisted records.
    pub fn count(&self) -> StoreResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count)
    }

    /// All records in insertion order.
    pub fn all(&self) -> StoreResult<Vec<EmployeeRecord>> {
        self.select("ORDER BY id ASC", &[])
    }

    /// Records in insertion order, capped for listing endpoints.
    pub fn list(&self, limit: i64) -> StoreResult<Vec<EmployeeRecord>> {
        self.select("ORDER BY id ASC LIMIT ?1", &[&limit])
    }

    fn select(
        &self,
        tail: &str,
        bind: &[&dyn rusqlite::types::ToSql],
    ) -> StoreResult<Vec<EmployeeRecord>> {
        let sql = format!("SELECT {} FROM employees {}", SELECT_COLUMNS, tail);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(bind, map_row)?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<EmployeeRecord> {
    let date_text: Option<String> = row.get(9)?;
    Ok(EmployeeRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        department: row.get(2)?,
        role: row.get(3)?,
        location: row.get(4)?,
        performance_score: row.get(5)?,
        projects_completed: row.get(6)?,
        sales: row.get(7)?,
        customer_satisfaction: row.get(8)?,
        // A date that no longer parses is treated as absent, consistent
        // with ingestion semantics.
        review_date: date_text.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(name: &str, score: f64) -> EmployeeRecord {
        let mut r = EmployeeRecord::empty();
        r.name = Some(name.to_string());
        r.performance_score = Some(score);
        r.review_date = NaiveDate::from_ymd_opt(2024, 3, 15);
        r
    }

    #[test]
    fn test_insert_and_read_back() {
        let mut store = EmployeeStore::in_memory().unwrap();
        store.insert_many(&[sample("Alice", 4.5), sample("Bob", 3.0)]).unwrap();

        let records = store.all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("Alice"));
        assert_eq!(records[0].id, Some(1));
        assert_eq!(records[1].id, Some(2));
        assert_eq!(records[0].review_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_roundtrip_preserves_field_values() {
        let mut store = EmployeeStore::in_memory().unwrap();
        let mut original = EmployeeRecord::empty();
        original.name = Some("Dana".into());
        original.department = Some("Engineering".into());
        original.role = Some("Lead".into());
        original.location = Some("Berlin".into());
        original.performance_score = Some(4.25);
        original.projects_completed = Some(12);
        original.sales = Some(12500.5);
        original.customer_satisfaction = Some(3.8);
        original.review_date = NaiveDate::from_ymd_opt(2023, 11, 30);

        store.insert_many(std::slice::from_ref(&original)).unwrap();
        let mut read_back = store.all().unwrap().remove(0);

        assert!(read_back.id.is_some());
        read_back.id = None;
        assert_eq!(read_back, original);
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let mut store = EmployeeStore::in_memory().unwrap();
        store.insert_many(&[EmployeeRecord::empty()]).unwrap();

        let record = store.all().unwrap().remove(0);
        assert_eq!(record.name, None);
        assert_eq!(record.performance_score, None);
        assert_eq!(record.review_date, None);
    }

    #[test]
    fn test_count_and_accumulation() {
        let mut store = EmployeeStore::in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);

        store.insert_many(&[sample("Alice", 4.5)]).unwrap();
        store.insert_many(&[sample("Alice", 4.5)]).unwrap();
        // Additive across uploads: no dedup.
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_list_caps_rows() {
        let mut store = EmployeeStore::in_memory().unwrap();
        let records: Vec<_> = (0..10).map(|i| sample("X", i as f64)).collect();
        store.insert_many(&records).unwrap();

        let listed = store.list(3).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, Some(1));
    }

    #[test]
    fn test_legacy_table_gains_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.db");

        // Simulate a database from before role/location existed.
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                "CREATE TABLE employees (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT,
                    department TEXT,
                    performance_score REAL,
                    projects_completed INTEGER,
                    sales REAL,
                    customer_satisfaction REAL,
                    review_date TEXT
                )",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO employees (name, department) VALUES ('Old', 'Sales')",
                [],
            )
            .unwrap();
        }

        let mut store = EmployeeStore::open(&path).unwrap();
        let records = store.all().unwrap();
        assert_eq!(records[0].name.as_deref(), Some("Old"));
        assert_eq!(records[0].role, None);

        // New records can use the migrated columns.
        let mut r = EmployeeRecord::empty();
        r.role = Some("Lead".into());
        r.location = Some("Paris".into());
        store.insert_many(&[r]).unwrap();

        let records = store.all().unwrap();
        assert_eq!(records[1].role.as_deref(), Some("Lead"));
        assert_eq!(records[1].location.as_deref(), Some("Paris"));
    }
}
