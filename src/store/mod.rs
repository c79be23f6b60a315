//! # Incident Store Module
//!
//! Persistence for scraped incidents. The store is a single local libsql
//! database with one `incidents` table whose `title` column is unique, which
//! makes every insert idempotent across repeated crawl runs.
//!
//! ## Key Components
//!
//! - `IncidentStore`: insert-if-new and batch insert over one connection
//! - `InsertOutcome`: inserted/skipped counts for a batch
//! - `DbError`: database failures (duplicates are not errors)

mod database;
pub mod error;
mod schema;

pub use database::IncidentStore;
pub use error::DbError;

use std::ops::AddAssign;

/// Result of offering a batch of incidents to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Incidents written as new rows
    pub inserted: usize,

    /// Incidents that were duplicates or news items
    pub skipped: usize,
}

impl AddAssign for InsertOutcome {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.skipped += other.skipped;
    }
}
