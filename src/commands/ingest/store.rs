use std::fs;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};

use super::error::IngestError;
use crate::model::InvoiceRecord;
use crate::util::now_utc_string;

pub const DB_SCHEMA_VERSION: &str = "1.0.0";

/// Keyed store of invoice records, one row per file name.
pub struct RecordStore {
    connection: Connection,
}

impl RecordStore {
    pub fn open(db_path: &Path) -> Result<Self, IngestError> {
        if let Some(parent) = db_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| IngestError::StoreDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let connection = Connection::open(db_path).map_err(|source| IngestError::Connection {
            path: db_path.to_path_buf(),
            source,
        })?;
        configure_connection(&connection).map_err(|source| IngestError::Connection {
            path: db_path.to_path_buf(),
            source,
        })?;

        Ok(Self { connection })
    }

    /// Opens an existing store without creating, configuring or writing it.
    pub fn open_read_only(db_path: &Path) -> Result<Self, IngestError> {
        let connection = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| IngestError::Connection {
            path: db_path.to_path_buf(),
            source,
        })?;
        Ok(Self { connection })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, IngestError> {
        let connection =
            Connection::open_in_memory().map_err(|source| IngestError::Connection {
                path: ":memory:".into(),
                source,
            })?;
        Ok(Self { connection })
    }

    pub fn ensure_schema(&self) -> Result<(), IngestError> {
        self.connection
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS metadata (
                  key TEXT PRIMARY KEY,
                  value TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS facturas (
                  file_name TEXT PRIMARY KEY,
                  page_count INTEGER,
                  cufe TEXT,
                  size_bytes INTEGER
                );
                ",
            )
            .map_err(|source| IngestError::storage("creating schema", source))?;

        let now = now_utc_string();
        for (key, value) in [
            ("db_schema_version", DB_SCHEMA_VERSION),
            ("db_updated_at", now.as_str()),
        ] {
            self.connection
                .execute(
                    "INSERT INTO metadata(key, value) VALUES(?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                    params![key, value],
                )
                .map_err(|source| IngestError::storage("recording schema metadata", source))?;
        }

        Ok(())
    }

    pub fn find(&self, file_name: &str) -> Result<Option<InvoiceRecord>, IngestError> {
        self.connection
            .query_row(
                "SELECT file_name, page_count, cufe, size_bytes FROM facturas WHERE file_name = ?1",
                [file_name],
                record_from_row,
            )
            .optional()
            .map_err(|source| IngestError::storage(format!("looking up {file_name}"), source))
    }

    /// Inserts the record or replaces every column of the existing row.
    pub fn upsert(&mut self, record: &InvoiceRecord) -> Result<(), IngestError> {
        let action = || format!("writing {}", record.file_name);

        let tx = self
            .connection
            .transaction()
            .map_err(|source| IngestError::storage(action(), source))?;

        tx.execute(
            "
            INSERT INTO facturas(file_name, page_count, cufe, size_bytes)
            VALUES(?1, ?2, ?3, ?4)
            ON CONFLICT(file_name) DO UPDATE SET
              page_count=excluded.page_count,
              cufe=excluded.cufe,
              size_bytes=excluded.size_bytes
            ",
            params![
                record.file_name,
                record.page_count,
                record.cufe,
                record.size_bytes as i64
            ],
        )
        .map_err(|source| IngestError::storage(action(), source))?;

        tx.commit()
            .map_err(|source| IngestError::storage(action(), source))
    }

    pub fn count(&self) -> Result<i64, IngestError> {
        self.connection
            .query_row("SELECT COUNT(*) FROM facturas", [], |row| row.get(0))
            .map_err(|source| IngestError::storage("counting records", source))
    }

    pub fn list(&self) -> Result<Vec<InvoiceRecord>, IngestError> {
        let load = || -> rusqlite::Result<Vec<InvoiceRecord>> {
            let mut statement = self.connection.prepare(
                "SELECT file_name, page_count, cufe, size_bytes FROM facturas ORDER BY file_name ASC",
            )?;
            let rows = statement.query_map([], record_from_row)?;
            rows.collect()
        };

        load().map_err(|source| IngestError::storage("listing records", source))
    }
}

fn configure_connection(connection: &Connection) -> rusqlite::Result<()> {
    connection.pragma_update(None, "journal_mode", "WAL")?;
    connection.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<InvoiceRecord> {
    let page_count: Option<i64> = row.get(1)?;
    let size_bytes: Option<i64> = row.get(3)?;

    Ok(InvoiceRecord {
        file_name: row.get(0)?,
        page_count: page_count.unwrap_or(0).max(0) as u32,
        cufe: row.get(2)?,
        size_bytes: size_bytes.unwrap_or(0).max(0) as u64,
    })
}
