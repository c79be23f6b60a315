//! # Store Error Types Module
//!
//! Error types for the incident store. Duplicate titles and filtered
//! categories are not errors; they surface as a `false` insert result. The
//! variants here cover genuine database failures.
//!
//! ## Key Components
//!
//! - `DbError::Connection`: the database file could not be opened
//! - `DbError::Schema`: the `incidents` table could not be created
//! - `DbError::Query`: an insert or lookup statement failed
//! - `DbError::Data`: a stored row did not have the expected shape

use thiserror::Error;

/// Failure while talking to the incidents database
#[derive(Debug, Error)]
pub enum DbError {
    /// Raw libsql failure without further context
    #[error("LibSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Statement execution failed
    #[error("SQL query error: {0}")]
    Query(String),

    /// Table creation failed
    #[error("Schema error: {0}")]
    Schema(String),

    /// Row or column could not be read back
    #[error("Data error: {0}")]
    Data(String),

    /// Database file could not be opened or connected to
    #[error("Connection error: {0}")]
    Connection(String),
}
