//! Error types for the avherald crate

use thiserror::Error;

/// Result type for headline parsing setup
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised while preparing the headline parsers
#[derive(Debug, Error)]
pub enum Error {
    /// A headline pattern failed to compile
    #[error("Failed to compile {name} pattern: {source}")]
    Pattern {
        /// Which pattern was rejected
        name: &'static str,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}

impl Error {
    pub(crate) fn pattern(name: &'static str) -> impl FnOnce(regex::Error) -> Self {
        move |source| Error::Pattern { name, source }
    }
}
