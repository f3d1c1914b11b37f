//! CSV ingestion into the dashboard store.
//!
//! Each file is streamed record by record into its table inside a single
//! transaction. The insert column list comes from the file's header row, so
//! the CSV header names must match the table's column names.

mod report;

pub use report::{LoadSummary, TableLoadReport};

use crate::db::DbPool;
use crate::schema::{self, LoadTarget};
use sea_orm::{
    ConnectionTrait, DatabaseTransaction, DbErr, Statement, TransactionTrait, Value,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Rows taken from each file when no explicit cap is configured
pub const DEFAULT_ROW_LIMIT: usize = 5000;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("unknown target table: {0}")]
    UnknownTable(String),

    #[error("{} has no header row", .path.display())]
    EmptyHeader { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum records accepted per file; `None` reads to the end
    pub row_limit: Option<usize>,
    pub delimiter: u8,
    /// Leave SQLite foreign-key checks on while loading
    pub enforce_foreign_keys: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            row_limit: Some(DEFAULT_ROW_LIMIT),
            delimiter: b',',
            enforce_foreign_keys: false,
        }
    }
}

impl LoaderOptions {
    pub fn with_row_limit(mut self, row_limit: Option<usize>) -> Self {
        self.row_limit = row_limit;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn insert_sql(table: &str, columns: &[String]) -> String {
    let column_list = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        column_list,
        placeholders
    )
}

/// Binds one record against the header's column count. Missing trailing
/// fields and empty fields become NULL; extra fields are ignored.
fn bind_values(record: &csv::StringRecord, width: usize) -> Vec<Value> {
    (0..width)
        .map(|idx| match record.get(idx) {
            Some(field) if !field.is_empty() => Value::from(field.to_string()),
            _ => Value::String(None),
        })
        .collect()
}

async fn abort(txn: DatabaseTransaction, table: &str) {
    if let Err(err) = txn.rollback().await {
        warn!(table, error = %err, "Rollback after stream failure did not complete");
    }
}

/// Streams `path` into `table` inside one transaction.
///
/// Rows that fail to insert are logged and counted as skipped. A read or
/// parse failure rolls the whole file back.
#[instrument(skip(db, path, options), fields(path = %path.display()))]
pub async fn load_csv<C>(
    db: &C,
    path: &Path,
    table: &str,
    options: &LoaderOptions,
) -> Result<TableLoadReport, LoadError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let target = LoadTarget::from_table_name(table)
        .ok_or_else(|| LoadError::UnknownTable(table.to_string()))?;
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(LoadError::EmptyHeader {
            path: path.to_path_buf(),
        });
    }

    let sql = insert_sql(target.table_name(), &columns);
    debug!(%sql, "Prepared insert");

    let backend = db.get_database_backend();
    let txn = db.begin().await?;
    let mut report = TableLoadReport::new(target.table_name());
    let mut record = csv::StringRecord::new();

    loop {
        if let Some(limit) = options.row_limit {
            if report.accepted() >= limit {
                // One look ahead tells a full stop from an exact fit.
                report.truncated = reader.read_record(&mut record).unwrap_or(true);
                break;
            }
        }

        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                abort(txn, target.table_name()).await;
                return Err(csv_error(err));
            }
        }

        let stmt =
            Statement::from_sql_and_values(backend, sql.as_str(), bind_values(&record, columns.len()));
        match txn.execute(stmt).await {
            Ok(_) => report.inserted += 1,
            Err(err) => {
                report.skipped += 1;
                warn!(
                    table = target.table_name(),
                    line = record.position().map(|p| p.line()),
                    error = %err,
                    "Skipping row that failed to insert"
                );
            }
        }
    }
    drop(reader);

    txn.commit().await?;
    Ok(report)
}

/// Full from-empty load of the four tables in dependency order
pub struct Loader {
    db: DbPool,
    options: LoaderOptions,
}

impl Loader {
    pub fn new(db: DbPool, options: LoaderOptions) -> Self {
        Self { db, options }
    }

    pub fn connection(&self) -> &DbPool {
        &self.db
    }

    async fn set_foreign_keys(&self) -> Result<(), DbErr> {
        let pragma = if self.options.enforce_foreign_keys {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                pragma.to_string(),
            ))
            .await?;
        Ok(())
    }

    /// Resets the schema and loads `users.csv`, `orders.csv`,
    /// `products.csv` and `order_items.csv` from `data_dir`.
    pub async fn run(&self, data_dir: &Path) -> Result<LoadSummary, LoadError> {
        self.set_foreign_keys().await?;
        schema::reset(&self.db).await?;
        info!(data_dir = %data_dir.display(), "Schema reset, loading tables");

        let mut summary = LoadSummary::default();
        for target in LoadTarget::ALL {
            let path = data_dir.join(target.file_name());
            let report = load_csv(&self.db, &path, target.table_name(), &self.options).await?;
            info!(
                table = %report.table,
                inserted = report.inserted,
                skipped = report.skipped,
                truncated = report.truncated,
                "Table loaded"
            );
            summary.tables.push(report);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user;
    use assert_matches::assert_matches;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use tempfile::TempDir;

    async fn store() -> DbPool {
        let db = crate::db::establish_loader_connection("sqlite::memory:")
            .await
            .unwrap();
        schema::create_all(&db).await.unwrap();
        db
    }

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const USERS: &str = "id,first_name,last_name,email,age\n\
                         1,Ada,Lovelace,ada@example.com,36\n\
                         2,Alan,Turing,,41\n\
                         3,Grace,Hopper,grace@example.com,85\n";

    #[test]
    fn insert_sql_quotes_identifiers() {
        let sql = insert_sql("users", &["id".to_string(), "we\"ird".to_string()]);
        assert_eq!(
            sql,
            r#"INSERT INTO "users" ("id", "we""ird") VALUES (?, ?)"#
        );
    }

    #[test]
    fn short_records_pad_with_null() {
        let record = csv::StringRecord::from(vec!["1", ""]);
        let values = bind_values(&record, 3);
        assert_eq!(values[0], Value::from("1".to_string()));
        assert_eq!(values[1], Value::String(None));
        assert_eq!(values[2], Value::String(None));
    }

    #[tokio::test]
    async fn loads_every_row_and_nulls_empty_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "users.csv", USERS.as_bytes());
        let db = store().await;

        let report = load_csv(&db, &path, "users", &LoaderOptions::default().with_row_limit(None))
            .await
            .unwrap();
        assert_eq!(report.inserted, 3);
        assert_eq!(report.skipped, 0);
        assert!(!report.truncated);

        let alan = user::Entity::find_by_id(2).one(&db).await.unwrap().unwrap();
        assert_eq!(alan.first_name.as_deref(), Some("Alan"));
        assert_eq!(alan.email, None);
        assert_eq!(alan.age, Some(41));
    }

    #[tokio::test]
    async fn ragged_records_are_inserted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "users.csv", b"id,first_name,age\n1,Ada\n2,Alan,41,extra\n");
        let db = store().await;

        let report = load_csv(&db, &path, "users", &LoaderOptions::default())
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 0);

        let ada = user::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
        assert_eq!(ada.first_name.as_deref(), Some("Ada"));
        assert_eq!(ada.age, None);

        let alan = user::Entity::find_by_id(2).one(&db).await.unwrap().unwrap();
        assert_eq!(alan.age, Some(41));
    }

    #[tokio::test]
    async fn row_cap_stops_without_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "users.csv", USERS.as_bytes());
        let db = store().await;

        let report = load_csv(&db, &path, "users", &LoaderOptions::default().with_row_limit(Some(2)))
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);
        assert!(report.truncated);
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn cap_matching_file_length_is_not_truncation() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "users.csv", USERS.as_bytes());
        let db = store().await;

        let report = load_csv(&db, &path, "users", &LoaderOptions::default().with_row_limit(Some(3)))
            .await
            .unwrap();
        assert_eq!(report.inserted, 3);
        assert!(!report.truncated);
    }

    #[tokio::test]
    async fn duplicate_key_is_skipped_and_counted() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "users.csv",
            b"id,first_name\n1,Ada\n1,Again\n2,Alan\n",
        );
        let db = store().await;

        let report = load_csv(&db, &path, "users", &LoaderOptions::default())
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 1);

        let ada = user::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
        assert_eq!(ada.first_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn parse_failure_rolls_back_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "users.csv",
            b"id,first_name\n1,Ada\n2,\xff\xfe\n3,Grace\n",
        );
        let db = store().await;

        let err = load_csv(&db, &path, "users", &LoaderOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, LoadError::Csv { .. });
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn semicolon_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "users.csv", b"id;first_name\n7;Edsger\n");
        let db = store().await;

        let report = load_csv(&db, &path, "users", &LoaderOptions::default().with_delimiter(b';'))
            .await
            .unwrap();
        assert_eq!(report.inserted, 1);
        let row = user::Entity::find_by_id(7).one(&db).await.unwrap().unwrap();
        assert_eq!(row.first_name.as_deref(), Some("Edsger"));
    }

    #[tokio::test]
    async fn file_level_failures() {
        let dir = TempDir::new().unwrap();
        let db = store().await;
        let opts = LoaderOptions::default();

        let missing = dir.path().join("nope.csv");
        assert_matches!(
            load_csv(&db, &missing, "users", &opts).await,
            Err(LoadError::Io { .. })
        );

        let empty = write(&dir, "empty.csv", b"");
        assert_matches!(
            load_csv(&db, &empty, "users", &opts).await,
            Err(LoadError::EmptyHeader { .. })
        );

        let users = write(&dir, "users.csv", USERS.as_bytes());
        assert_matches!(
            load_csv(&db, &users, "inventory_items", &opts).await,
            Err(LoadError::UnknownTable(name)) if name == "inventory_items"
        );
    }
}
