//! Defines the crate level error type.

/// The errors that may occur while tracking budgets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No category exists with the requested ID.
    #[error("the category {0} could not be found")]
    CategoryNotFound(i64),

    /// A stored amount could not be read back as a decimal.
    ///
    /// Callers should pass in the offending text.
    #[error("invalid amount \"{0}\" in the database")]
    InvalidAmount(String),

    /// The spending recorded against a category is too large to total.
    #[error("spending for category {0} exceeds the largest representable amount")]
    SpendingOverflow(i64),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
