use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    CoreError(#[from] zaalplan_core::error::CoreError),
}

impl DbError {
    /// Name of the violated constraint, when the database reported one.
    #[must_use]
    pub fn constraint_name(&self) -> Option<&str> {
        match self {
            Self::DatabaseError(diesel::result::Error::DatabaseError(_, info)) => {
                info.constraint_name()
            }
            _ => None,
        }
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
