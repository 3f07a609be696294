use thiserror::Error;

/// Outcome taxonomy shared by every catalog/ledger/stats operation. The host
/// transport maps these onto its own response codes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("not authorized")]
    NotAuthorized,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Converts a unique-constraint violation into `Conflict`, leaving every
    /// other storage failure untouched.
    pub(crate) fn on_unique(e: sqlx::Error, msg: &str) -> Self {
        if is_unique_violation(&e) {
            Error::Conflict(msg.to_string())
        } else {
            Error::Storage(e)
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
