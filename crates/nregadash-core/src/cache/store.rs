use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::{StoreError, StoreResult};
use crate::models::MetricRecord;

const SCHEMA_SQL: &str = include_str!("schema.sql");

const SELECT_COLUMNS: &str = "region, sub_region, year, month, households, person_days, \
                              expenditure, avg_wage, updated_at";

/// Durable table of district metrics.
///
/// Opened once at startup and handed to the retrieval policy. The
/// connection sits behind a mutex so the handle can be shared by
/// reference; SQLite's own file locking covers other processes.
#[derive(Debug)]
pub struct MetricStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl MetricStore {
    /// Open (or create) the store at `path`, creating parent directories
    /// and the schema as needed.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        debug!(path = %path.display(), "Opened metric store");

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
        })
    }

    /// A throwaway store that lives only as long as the handle.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert or replace records by (region, sub_region, year, month).
    /// All rows are written in one transaction. Returns the number written.
    pub fn upsert(&self, records: &[MetricRecord]) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO district_metrics (
                   region, sub_region, year, month, households, person_days,
                   expenditure, avg_wage, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(region, sub_region, year, month) DO UPDATE SET
                   households = excluded.households,
                   person_days = excluded.person_days,
                   expenditure = excluded.expenditure,
                   avg_wage = excluded.avg_wage,
                   updated_at = excluded.updated_at",
            )?;
            for record in records {
                stmt.execute(params![
                    record.region,
                    record.sub_region,
                    record.year,
                    record.month,
                    to_sql_count(record.households)?,
                    to_sql_count(record.person_days)?,
                    record.expenditure,
                    record.avg_wage,
                    encode_timestamp(record.updated_at),
                ])?;
            }
        }
        tx.commit()?;

        debug!(count = records.len(), "Upserted metric records");
        Ok(records.len())
    }

    /// All records for a district, newest period first.
    pub fn records_for(&self, region: &str, sub_region: &str) -> StoreResult<Vec<MetricRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM district_metrics
             WHERE region = ?1 AND sub_region = ?2
             ORDER BY year DESC, month DESC",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![region, sub_region], parse_record_row)?;
        collect_rows(rows)
    }

    /// Every district's record for one region and period.
    pub fn records_for_period(
        &self,
        region: &str,
        year: i32,
        month: u32,
    ) -> StoreResult<Vec<MetricRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM district_metrics
             WHERE region = ?1 AND year = ?2 AND month = ?3
             ORDER BY sub_region",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![region, year, month], parse_record_row)?;
        collect_rows(rows)
    }

    /// Distinct regions with at least one stored record.
    pub fn regions(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT region FROM district_metrics ORDER BY region")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct sub-regions of `region` with at least one stored record.
    pub fn sub_regions(&self, region: &str) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT sub_region FROM district_metrics
             WHERE region = ?1 ORDER BY sub_region",
        )?;
        let rows = stmt.query_map([region], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

/// Timestamps are stored as fixed-width RFC 3339 UTC text so that
/// `MAX(updated_at)` orders correctly.
fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidValue(format!("updated_at '{}': {}", value, e)))
}

fn to_sql_count(value: u64) -> StoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidValue(format!("count {} exceeds storage range", value)))
}

/// Intermediate row shape; timestamp and counts are validated after the
/// rusqlite closure so failures surface as `StoreError`.
struct StoredRow {
    region: String,
    sub_region: String,
    year: i32,
    month: u32,
    households: i64,
    person_days: i64,
    expenditure: f64,
    avg_wage: f64,
    updated_at: String,
}

fn parse_record_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        region: row.get(0)?,
        sub_region: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        households: row.get(4)?,
        person_days: row.get(5)?,
        expenditure: row.get(6)?,
        avg_wage: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn collect_rows(
    rows: impl Iterator<Item = rusqlite::Result<StoredRow>>,
) -> StoreResult<Vec<MetricRecord>> {
    rows.map(|row| {
        let row = row?;
        Ok(MetricRecord {
            households: from_sql_count(row.households)?,
            person_days: from_sql_count(row.person_days)?,
            updated_at: decode_timestamp(&row.updated_at)?,
            region: row.region,
            sub_region: row.sub_region,
            year: row.year,
            month: row.month,
            expenditure: row.expenditure,
            avg_wage: row.avg_wage,
        })
    })
    .collect()
}

fn from_sql_count(value: i64) -> StoreResult<u64> {
    u64::try_from(value)
        .map_err(|_| StoreError::InvalidValue(format!("negative count {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sub_region: &str, year: i32, month: u32, person_days: u64) -> MetricRecord {
        MetricRecord {
            region: "Uttar Pradesh".to_string(),
            sub_region: sub_region.to_string(),
            year,
            month,
            households: 23_450,
            person_days,
            expenditure: 58_000_000.0,
            avg_wage: 235.5,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn upsert_then_read_returns_same_record() {
        let store = MetricStore::open_in_memory().expect("store");
        let written = record("Lucknow", 2024, 6, 420_000);

        store.upsert(std::slice::from_ref(&written)).expect("upsert");
        let read = store.records_for("Uttar Pradesh", "Lucknow").expect("read");

        assert_eq!(read.len(), 1);
        // Timestamps are persisted at millisecond precision
        let mut expected = written.clone();
        expected.updated_at = decode_timestamp(&encode_timestamp(written.updated_at)).unwrap();
        assert_eq!(read[0], expected);
    }

    #[test]
    fn second_write_overwrites_instead_of_accumulating() {
        let store = MetricStore::open_in_memory().expect("store");
        store.upsert(&[record("Lucknow", 2024, 6, 100)]).expect("first");
        store.upsert(&[record("Lucknow", 2024, 6, 250)]).expect("second");

        let read = store.records_for("Uttar Pradesh", "Lucknow").expect("read");
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].person_days, 250);
    }

    #[test]
    fn records_are_newest_first_and_scoped_to_district() {
        let store = MetricStore::open_in_memory().expect("store");
        store
            .upsert(&[
                record("Lucknow", 2023, 12, 1),
                record("Lucknow", 2024, 2, 2),
                record("Agra", 2024, 3, 3),
                record("Lucknow", 2024, 1, 4),
            ])
            .expect("upsert");

        let read = store.records_for("Uttar Pradesh", "Lucknow").expect("read");
        let periods: Vec<(i32, u32)> = read.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(periods, vec![(2024, 2), (2024, 1), (2023, 12)]);
    }

    #[test]
    fn region_and_sub_region_listing() {
        let store = MetricStore::open_in_memory().expect("store");
        let mut bihar = record("Patna", 2024, 6, 1);
        bihar.region = "Bihar".to_string();
        store
            .upsert(&[
                record("Varanasi", 2024, 6, 1),
                record("Lucknow", 2024, 6, 1),
                record("Lucknow", 2024, 5, 1),
                bihar,
            ])
            .expect("upsert");

        assert_eq!(store.regions().unwrap(), vec!["Bihar", "Uttar Pradesh"]);
        assert_eq!(
            store.sub_regions("Uttar Pradesh").unwrap(),
            vec!["Lucknow", "Varanasi"]
        );
        assert_eq!(
            store.records_for_period("Uttar Pradesh", 2024, 6).unwrap().len(),
            2
        );
    }

    #[test]
    fn open_creates_file_and_persists_across_handles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("nested").join("data_cache.db");

        {
            let store = MetricStore::open(&db_path).expect("open");
            store.upsert(&[record("Agra", 2024, 4, 77)]).expect("upsert");
        }

        let reopened = MetricStore::open(&db_path).expect("reopen");
        let read = reopened.records_for("Uttar Pradesh", "Agra").expect("read");
        assert_eq!(read[0].person_days, 77);
        assert_eq!(reopened.path(), Some(db_path.as_path()));
    }
}
