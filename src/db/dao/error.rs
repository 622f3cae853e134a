use sea_orm::{DbErr, SqlErr};

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(DbErr),
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("{entity} violates a unique constraint")]
    UniqueViolation { entity: &'static str },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    /// Classifies an insert/update failure. The store's unique constraint is
    /// the authoritative duplicate signal, so it must not collapse into a
    /// generic database error.
    pub fn from_write(entity: &'static str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::UniqueViolation { entity },
            _ => Self::Db(err),
        }
    }
}

impl From<DbErr> for DaoLayerError {
    fn from(err: DbErr) -> Self {
        Self::Db(err)
    }
}
