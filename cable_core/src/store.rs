//! SQLite-backed cable parameter store.
//!
//! RULE: only this module talks to the database. The embedded catalog in
//! [`crate::catalog`] is the source of truth; the store is a derived,
//! rebuildable cache seeded from it exactly once per database file.
//!
//! Opening is idempotent: the schema is created with `IF NOT EXISTS` and
//! the seed runs only when the store is empty. The emptiness check and the
//! bulk insert share one IMMEDIATE transaction, so two processes racing on
//! first open cannot both seed, and a failure mid-seed rolls the whole
//! transaction back leaving the store empty for a clean retry.
//!
//! An open failure is not fatal to the application: callers fall back to
//! the embedded catalog and run read-only.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, info};

use crate::catalog::{self, CableRecord};
use crate::errors::{CableError, CableResult};

/// Default store filename, created in the working directory.
pub const DEFAULT_STORE_FILE: &str = "cable_design.db";

const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS cable_size (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        size_mm2 INTEGER NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS cable_electrical_data (
        id                                                       INTEGER PRIMARY KEY AUTOINCREMENT,
        cable_size_id                                            INTEGER NOT NULL,
        max_dc_resistance_20C_ohm_per_km                         REAL,
        ac_resistance_50hz_90C_trefoil_touching_ohm_per_km       REAL,
        ac_resistance_50hz_90C_flat_touching_ohm_per_km          REAL,
        ac_resistance_50hz_90C_flat_spaced_ohm_per_km            REAL,
        inductive_reactance_50hz_90C_trefoil_touching_ohm_per_km REAL,
        inductive_reactance_50hz_90C_flat_touching_ohm_per_km    REAL,
        inductive_reactance_50hz_90C_flat_spaced_ohm_per_km      REAL,
        insulation_resistance_20C_Mohm_km                        REAL,
        conductor_to_screen_capacitance_uF_per_km                REAL,
        charging_current_per_phase_A_per_km                      REAL,
        dielectric_loss_per_phase_W_per_km                       REAL,
        max_dielectric_stress_kV_per_mm                          REAL,
        screen_dc_resistance_20C_ohm_per_km                      REAL,
        zero_sequence_resistance_20C_ohm_per_km                  REAL,
        zero_sequence_reactance_50hz_ohm_per_km                  REAL,
        FOREIGN KEY (cable_size_id) REFERENCES cable_size(id) ON DELETE CASCADE
    );
";

const RECORD_COLUMNS: &str = "
    s.size_mm2,
    e.max_dc_resistance_20C_ohm_per_km,
    e.ac_resistance_50hz_90C_trefoil_touching_ohm_per_km,
    e.ac_resistance_50hz_90C_flat_touching_ohm_per_km,
    e.ac_resistance_50hz_90C_flat_spaced_ohm_per_km,
    e.inductive_reactance_50hz_90C_trefoil_touching_ohm_per_km,
    e.inductive_reactance_50hz_90C_flat_touching_ohm_per_km,
    e.inductive_reactance_50hz_90C_flat_spaced_ohm_per_km,
    e.insulation_resistance_20C_Mohm_km,
    e.conductor_to_screen_capacitance_uF_per_km,
    e.charging_current_per_phase_A_per_km,
    e.dielectric_loss_per_phase_W_per_km,
    e.max_dielectric_stress_kV_per_mm,
    e.screen_dc_resistance_20C_ohm_per_km,
    e.zero_sequence_resistance_20C_ohm_per_km,
    e.zero_sequence_reactance_50hz_ohm_per_km
";

/// Persistent home for the cable parameter catalog.
#[derive(Debug)]
pub struct CableStore {
    conn: Connection,
    path: Option<PathBuf>, // None for :memory:
}

impl CableStore {
    /// Open (or create) the store at `path`, creating the schema and
    /// seeding it from the embedded catalog on first use.
    pub fn open(path: impl AsRef<Path>) -> CableResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| CableError::store_open(path.display().to_string(), e.to_string()))?;

        // WAL mode only matters for real files; failure to switch is not an
        // open failure.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| CableError::store_open(path.display().to_string(), e.to_string()))?;

        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.create_schema()?;
        store.seed_if_empty()?;
        debug!(path = %path.display(), "cable store open");
        Ok(store)
    }

    /// Open an in-memory store (used in tests). Same schema and seeding
    /// path as [`CableStore::open`].
    pub fn in_memory() -> CableResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CableError::store_open(":memory:", e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| CableError::store_open(":memory:", e.to_string()))?;

        let mut store = Self { conn, path: None };
        store.create_schema()?;
        store.seed_if_empty()?;
        Ok(store)
    }

    /// Path of the underlying database file, if this store is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn create_schema(&self) -> CableResult<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| CableError::schema(e.to_string()))
    }

    /// Seed the store from the embedded catalog iff it is empty.
    ///
    /// The row count is read inside the IMMEDIATE transaction: a second
    /// process cannot observe "empty" concurrently and double-seed, and any
    /// insert failure rolls back the whole seed.
    fn seed_if_empty(&mut self) -> CableResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| CableError::seed(e.to_string()))?;

        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM cable_size", [], |row| row.get(0))
            .map_err(|e| CableError::seed(e.to_string()))?;
        if count > 0 {
            debug!(rows = count, "cable store already seeded");
            return Ok(());
        }

        {
            let mut insert_size = tx
                .prepare("INSERT INTO cable_size (size_mm2) VALUES (?1)")
                .map_err(|e| CableError::seed(e.to_string()))?;
            let mut insert_data = tx
                .prepare(
                    "INSERT INTO cable_electrical_data (
                        cable_size_id,
                        max_dc_resistance_20C_ohm_per_km,
                        ac_resistance_50hz_90C_trefoil_touching_ohm_per_km,
                        ac_resistance_50hz_90C_flat_touching_ohm_per_km,
                        ac_resistance_50hz_90C_flat_spaced_ohm_per_km,
                        inductive_reactance_50hz_90C_trefoil_touching_ohm_per_km,
                        inductive_reactance_50hz_90C_flat_touching_ohm_per_km,
                        inductive_reactance_50hz_90C_flat_spaced_ohm_per_km,
                        insulation_resistance_20C_Mohm_km,
                        conductor_to_screen_capacitance_uF_per_km,
                        charging_current_per_phase_A_per_km,
                        dielectric_loss_per_phase_W_per_km,
                        max_dielectric_stress_kV_per_mm,
                        screen_dc_resistance_20C_ohm_per_km,
                        zero_sequence_resistance_20C_ohm_per_km,
                        zero_sequence_reactance_50hz_ohm_per_km
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                )
                .map_err(|e| CableError::seed(e.to_string()))?;

            for cable in catalog::catalog() {
                insert_size
                    .execute(params![cable.size_mm2])
                    .map_err(|e| CableError::seed(e.to_string()))?;
                let size_id = tx.last_insert_rowid();

                // Option<f64> binds NULL for the absent flat-spaced
                // resistance; the sentinel never reaches the disk.
                insert_data
                    .execute(params![
                        size_id,
                        cable.max_dc_resistance_20c,
                        cable.ac_resistance_trefoil_touching,
                        cable.ac_resistance_flat_touching,
                        cable.ac_resistance_flat_spaced,
                        cable.inductive_reactance_trefoil_touching,
                        cable.inductive_reactance_flat_touching,
                        cable.inductive_reactance_flat_spaced,
                        cable.insulation_resistance_20c,
                        cable.conductor_to_screen_capacitance,
                        cable.charging_current_per_phase,
                        cable.dielectric_loss_per_phase,
                        cable.max_dielectric_stress,
                        cable.screen_dc_resistance_20c,
                        cable.zero_sequence_resistance_20c,
                        cable.zero_sequence_reactance_50hz,
                    ])
                    .map_err(|e| CableError::seed(e.to_string()))?;
            }
        }

        tx.commit().map_err(|e| CableError::seed(e.to_string()))?;
        info!(
            rows = catalog::catalog().len(),
            "seeded cable store from embedded catalog"
        );
        Ok(())
    }

    /// Every record, ordered by conductor size ascending. An empty store
    /// yields an empty vec, not an error.
    pub fn all_records(&self) -> CableResult<Vec<CableRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS}
             FROM cable_electrical_data e
             JOIN cable_size s ON s.id = e.cable_size_id
             ORDER BY s.size_mm2"
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| CableError::query(e.to_string()))?;
        let records = stmt
            .query_map([], row_to_record)
            .map_err(|e| CableError::query(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CableError::query(e.to_string()))?;
        Ok(records)
    }

    /// Exact-match lookup by conductor size. `None` means "not found";
    /// the store never invents a default record.
    pub fn record_by_size(&self, size_mm2: u32) -> CableResult<Option<CableRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS}
             FROM cable_electrical_data e
             JOIN cable_size s ON s.id = e.cable_size_id
             WHERE s.size_mm2 = ?1"
        );
        self.conn
            .prepare(&sql)
            .map_err(|e| CableError::query(e.to_string()))?
            .query_row(params![size_mm2], row_to_record)
            .optional()
            .map_err(|e| CableError::query(e.to_string()))
    }

    /// Ascending list of the distinct conductor sizes present.
    pub fn available_sizes(&self) -> CableResult<Vec<u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT size_mm2 FROM cable_size ORDER BY size_mm2")
            .map_err(|e| CableError::query(e.to_string()))?;
        let sizes = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| CableError::query(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CableError::query(e.to_string()))?;
        Ok(sizes)
    }

    /// Release the underlying connection. Consuming `self` makes
    /// use-after-close unrepresentable; dropping the store is equivalent.
    pub fn close(self) -> CableResult<()> {
        self.conn
            .close()
            .map_err(|(_conn, e)| CableError::internal(e.to_string()))
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CableRecord> {
    Ok(CableRecord {
        size_mm2: row.get(0)?,
        max_dc_resistance_20c: row.get(1)?,
        ac_resistance_trefoil_touching: row.get(2)?,
        ac_resistance_flat_touching: row.get(3)?,
        // NULL on disk comes back as a true "no value", never a sentinel
        ac_resistance_flat_spaced: row.get(4)?,
        inductive_reactance_trefoil_touching: row.get(5)?,
        inductive_reactance_flat_touching: row.get(6)?,
        inductive_reactance_flat_spaced: row.get(7)?,
        insulation_resistance_20c: row.get(8)?,
        conductor_to_screen_capacitance: row.get(9)?,
        charging_current_per_phase: row.get(10)?,
        dielectric_loss_per_phase: row.get(11)?,
        max_dielectric_stress: row.get(12)?,
        screen_dc_resistance_20c: row.get(13)?,
        zero_sequence_resistance_20c: row.get(14)?,
        zero_sequence_reactance_50hz: row.get(15)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_seeds_from_catalog() {
        let store = CableStore::in_memory().unwrap();
        let records = store.all_records().unwrap();
        assert_eq!(records.len(), catalog::catalog().len());
    }

    #[test]
    fn test_records_round_trip_exactly() {
        // SQLite REAL is an 8-byte IEEE float, so the catalog must come
        // back bit-for-bit - including the absent flat-spaced resistance.
        let store = CableStore::in_memory().unwrap();
        let records = store.all_records().unwrap();
        assert_eq!(records, catalog::catalog().to_vec());
    }

    #[test]
    fn test_records_unique_and_ascending() {
        let store = CableStore::in_memory().unwrap();
        let records = store.all_records().unwrap();
        for pair in records.windows(2) {
            assert!(pair[0].size_mm2 < pair[1].size_mm2);
        }
    }

    #[test]
    fn test_available_sizes_match_record_keys() {
        let store = CableStore::in_memory().unwrap();
        let sizes = store.available_sizes().unwrap();
        let keys: Vec<u32> = store
            .all_records()
            .unwrap()
            .iter()
            .map(|r| r.size_mm2)
            .collect();
        assert_eq!(sizes, keys);
    }

    #[test]
    fn test_flat_spaced_resistance_stays_absent() {
        let store = CableStore::in_memory().unwrap();
        let cable = store.record_by_size(240).unwrap().unwrap();
        assert_eq!(cable.ac_resistance_flat_spaced, None);
        assert_eq!(cable.ac_resistance_flat_touching, 0.0972);
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let store = CableStore::in_memory().unwrap();
        assert_eq!(store.record_by_size(9999).unwrap(), None);
    }

    #[test]
    fn test_reopen_does_not_reseed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cable_design.db");

        let first = CableStore::open(&path).unwrap();
        let expected = first.all_records().unwrap();
        first.close().unwrap();

        let second = CableStore::open(&path).unwrap();
        let records = second.all_records().unwrap();
        assert_eq!(records, expected);
        assert_eq!(records.len(), catalog::catalog().len());
    }

    #[test]
    fn test_open_failure_surfaces_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        // A directory is not a valid database file.
        let err = CableStore::open(dir.path()).unwrap_err();
        assert!(err.is_open_failure());
    }

    #[test]
    fn test_close_is_clean() {
        let store = CableStore::in_memory().unwrap();
        store.close().unwrap();
    }
}
