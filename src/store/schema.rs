//! Table definition for stored incidents

use crate::store::error::DbError;
use libsql::{Connection, params};

/// Create the incidents table if it does not exist yet.
///
/// Safe to call on every startup.
pub async fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS incidents (
            category TEXT,
            title TEXT UNIQUE,
            location TEXT,
            cause TEXT,
            timestamp INTEGER,
            url TEXT
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create incidents table: {}", e)))?;

    Ok(())
}
