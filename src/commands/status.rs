use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::ingest::RecordStore;

pub fn run(args: StatusArgs) -> Result<()> {
    if !args.db_path.exists() {
        warn!(path = %args.db_path.display(), "database file missing");
        return Ok(());
    }

    let store = RecordStore::open_read_only(&args.db_path)?;

    let records = match store.list() {
        Ok(records) => records,
        Err(error) => {
            warn!(path = %args.db_path.display(), error = %error, "failed to read records");
            return Ok(());
        }
    };
    info!(
        path = %args.db_path.display(),
        records = records.len(),
        "database status"
    );

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&records).context("failed to serialize records")?;
        println!("{rendered}");
        return Ok(());
    }

    for record in &records {
        info!(
            file = %record.file_name,
            pages = record.page_count,
            cufe = %record.cufe.as_deref().unwrap_or_default(),
            size_bytes = record.size_bytes,
            "record"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::model::InvoiceRecord;

    fn updated_at(db_path: &std::path::Path) -> String {
        let connection = Connection::open(db_path).expect("db should open");
        connection
            .query_row(
                "SELECT value FROM metadata WHERE key = 'db_updated_at'",
                [],
                |row| row.get(0),
            )
            .expect("db_updated_at should exist")
    }

    #[test]
    fn status_leaves_the_database_untouched() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let db_path = dir.path().join("facturas.db");
        {
            let mut store = RecordStore::open(&db_path).expect("store should open");
            store.ensure_schema().expect("schema should be created");
            store
                .upsert(&InvoiceRecord {
                    file_name: "f1.pdf".to_string(),
                    page_count: 1,
                    cufe: Some("ab".repeat(48)),
                    size_bytes: 10,
                })
                .expect("upsert should succeed");
        }
        Connection::open(&db_path)
            .expect("db should open")
            .execute(
                "UPDATE metadata SET value = 'unchanged' WHERE key = 'db_updated_at'",
                [],
            )
            .expect("metadata should update");

        for json in [false, true] {
            run(StatusArgs {
                db_path: db_path.clone(),
                json,
            })
            .expect("status should succeed");
        }

        assert_eq!(updated_at(&db_path), "unchanged");
    }

    #[test]
    fn status_does_not_create_tables_in_a_foreign_database() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let db_path = dir.path().join("other.db");
        Connection::open(&db_path)
            .expect("db should open")
            .execute_batch("CREATE TABLE unrelated (id INTEGER);")
            .expect("table should be created");

        run(StatusArgs {
            db_path: db_path.clone(),
            json: false,
        })
        .expect("status should log and succeed");

        let tables: i64 = Connection::open(&db_path)
            .expect("db should open")
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .expect("table count should load");
        assert_eq!(tables, 1);
    }
}
