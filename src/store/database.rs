//! Database operations for the incident store

use crate::incident::Incident;
use crate::store::InsertOutcome;
use crate::store::error::DbError;
use crate::store::schema;
use libsql::{Connection, Row, Rows, Value, params};
use std::path::Path;
use tracing::{debug, instrument};

/// Deduplicating, append-only store of incidents keyed by title
#[derive(Clone)]
pub struct IncidentStore {
    conn: Connection,
}

impl IncidentStore {
    /// Wrap an open connection, creating the incidents table if needed
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, DbError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Open (or create) the database file at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let db = libsql::Builder::new_local(path.as_ref())
            .build()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Execute a custom query with parameters
    pub async fn execute_query<P>(&self, sql: &str, params: P) -> Result<Rows, DbError>
    where
        P: libsql::params::IntoParams,
    {
        self.conn
            .query(sql, params)
            .await
            .map_err(|e| DbError::Query(format!("Failed to execute query: {}", e)))
    }

    /// Store the incident unless its title is already known.
    ///
    /// Returns `true` when a new row was written. News items and duplicate
    /// titles return `false`; news items never reach the database.
    pub async fn insert_if_new(&self, incident: &Incident) -> Result<bool, DbError> {
        if incident.is_news() {
            debug!(title = %incident.title, "Skipping news item");
            return Ok(false);
        }

        let timestamp = match incident.timestamp {
            Some(ts) => Value::Integer(ts),
            None => Value::Null,
        };
        let values: Vec<Value> = vec![
            incident.category.clone().into(),
            incident.title.clone().into(),
            incident.location.clone().into(),
            incident.cause.clone().into(),
            timestamp,
            incident.url.clone().into(),
        ];

        let changed = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO incidents (category, title, location, cause, timestamp, url)
                 VALUES (?, ?, ?, ?, ?, ?)",
                values,
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to insert incident: {}", e)))?;

        let inserted = changed == 1;
        debug!(title = %incident.title, inserted, "Insert attempted");
        Ok(inserted)
    }

    /// Offer each incident to [`insert_if_new`](Self::insert_if_new) in order.
    ///
    /// Every insert commits on its own, so an error part way through keeps
    /// the rows written before it.
    #[instrument(skip_all, fields(count = incidents.len()))]
    pub async fn insert_all(&self, incidents: &[Incident]) -> Result<InsertOutcome, DbError> {
        let mut outcome = InsertOutcome::default();
        for incident in incidents {
            if self.insert_if_new(incident).await? {
                outcome.inserted += 1;
            } else {
                outcome.skipped += 1;
            }
        }
        Ok(outcome)
    }

    /// Number of stored incidents
    pub async fn count(&self) -> Result<u64, DbError> {
        let mut rows = self
            .execute_query("SELECT COUNT(*) FROM incidents", params![])
            .await?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(0),
            Err(e) => return Err(DbError::Data(format!("Failed to get count: {}", e))),
        };

        let count: i64 = row
            .get(0)
            .map_err(|e| DbError::Data(format!("Failed to get count from row: {}", e)))?;
        Ok(count as u64)
    }

    /// Look up a stored incident by its title
    pub async fn get_by_title(&self, title: &str) -> Result<Option<Incident>, DbError> {
        let mut rows = self
            .execute_query(
                "SELECT category, title, location, cause, timestamp, url
                 FROM incidents
                 WHERE title = ?",
                params![title.to_string()],
            )
            .await?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_incident(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::Data(format!("Failed to get incident: {}", e))),
        }
    }
}

fn row_to_incident(row: &Row) -> Result<Incident, DbError> {
    let text = |idx: i32| -> Result<String, DbError> {
        row.get(idx)
            .map_err(|e| DbError::Data(format!("Failed to read column {}: {}", idx, e)))
    };

    let timestamp = match row.get_value(4)? {
        Value::Integer(ts) => Some(ts),
        Value::Null => None,
        other => {
            return Err(DbError::Data(format!(
                "Unexpected timestamp value: {:?}",
                other
            )));
        }
    };

    Ok(Incident {
        category: text(0)?,
        title: text(1)?,
        location: text(2)?,
        cause: text(3)?,
        timestamp,
        url: text(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    async fn setup_test_db() -> Result<(IncidentStore, tempfile::TempDir), DbError> {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.sqlite");

        let store = IncidentStore::open(&db_path).await?;

        Ok((store, temp_dir))
    }

    fn incident(title: &str, category: &str) -> Incident {
        Incident {
            category: category.to_string(),
            title: title.to_string(),
            location: "Test Location".to_string(),
            cause: "Test Cause".to_string(),
            timestamp: Some(1234567890),
            url: "http://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_schema_initialization() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        let mut result = store
            .execute_query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name = 'incidents'",
                params![],
            )
            .await
            .unwrap();

        let row = result.next().await.unwrap().unwrap();
        let table_name: String = row.get(0).unwrap();
        assert_eq!(table_name, "incidents");
    }

    #[tokio::test]
    async fn test_reopen_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.sqlite");

        let store = IncidentStore::open(&db_path).await.unwrap();
        assert!(store.insert_if_new(&incident("Test Title", "incident")).await.unwrap());
        drop(store);

        let store = IncidentStore::open(&db_path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(!store.insert_if_new(&incident("Test Title", "incident")).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_if_new_and_insert_all() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();
        let first = incident("Test Title", "incident");

        assert!(store.insert_if_new(&first).await.unwrap());
        assert!(!store.insert_if_new(&first).await.unwrap());

        let batch = vec![first.clone(), incident("Test Title 2", "incident")];
        let outcome = store.insert_all(&batch).await.unwrap();
        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_title_keeps_first_record() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        let mut original = incident("Same Title", "incident");
        original.cause = "First cause".to_string();
        let mut later = incident("Same Title", "accident");
        later.cause = "Second cause".to_string();

        assert!(store.insert_if_new(&original).await.unwrap());
        assert!(!store.insert_if_new(&later).await.unwrap());

        let stored = store.get_by_title("Same Title").await.unwrap().unwrap();
        assert_eq!(stored, original);
    }

    #[tokio::test]
    async fn test_news_is_never_stored() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        for category in ["news", "NEWS", "News"] {
            let news = incident(&format!("Headline {}", category), category);
            assert!(!store.insert_if_new(&news).await.unwrap());
            assert!(store.get_by_title(&news.title).await.unwrap().is_none());
        }
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_timestamp_round_trips_as_none() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();

        let mut undated = incident("Undated", "incident");
        undated.timestamp = None;
        assert!(store.insert_if_new(&undated).await.unwrap());

        let stored = store.get_by_title("Undated").await.unwrap().unwrap();
        assert_eq!(stored.timestamp, None);
    }

    #[tokio::test]
    async fn test_get_by_title_missing() {
        let (store, _temp_dir) = setup_test_db().await.unwrap();
        assert!(store.get_by_title("Nothing").await.unwrap().is_none());
    }
}
