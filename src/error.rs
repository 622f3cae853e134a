use crate::db::dao::DaoLayerError;

/// Domain error taxonomy. Every variant carries the human-readable message;
/// the stable machine code lives in [`AppError::code`] and the HTTP status in
/// `response::status_for`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DuplicateEmail(String),
    #[error("{0}")]
    InvalidRole(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    TransactionFailed(String),
    #[error("{0}")]
    CryptoUnavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn duplicate_email() -> Self {
        Self::DuplicateEmail("User already exists".to_string())
    }

    pub fn invalid_role(raw: &str) -> Self {
        Self::InvalidRole(format!("Invalid role: {raw}"))
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials("Invalid credentials".to_string())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn transaction_failed(message: impl Into<String>) -> Self {
        Self::TransactionFailed(message.into())
    }

    pub fn crypto_unavailable(message: impl Into<String>) -> Self {
        Self::CryptoUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::DuplicateEmail(message)
            | Self::InvalidRole(message)
            | Self::InvalidCredentials(message)
            | Self::Unauthenticated(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::TransactionFailed(message)
            | Self::CryptoUnavailable(message)
            | Self::Internal(message) => message.as_str(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::DuplicateEmail(_) => "duplicate_email",
            Self::InvalidRole(_) => "invalid_role",
            Self::InvalidCredentials(_) => "invalid_credentials",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::TransactionFailed(_) => "transaction_failed",
            Self::CryptoUnavailable(_) => "crypto_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::UniqueViolation { .. } => AppError::duplicate_email(),
            // Store-level failures never leak SQL detail to the caller.
            DaoLayerError::Db(db_err) => {
                tracing::error!(error = %db_err, "database operation failed");
                AppError::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use crate::db::dao::DaoLayerError;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AppError::duplicate_email().code(), "duplicate_email");
        assert_eq!(AppError::invalid_credentials().code(), "invalid_credentials");
        assert_eq!(AppError::unauthenticated("x").code(), "unauthenticated");
        assert_eq!(AppError::forbidden("x").code(), "forbidden");
    }

    #[test]
    fn unknown_email_and_wrong_password_share_one_error() {
        let a = AppError::invalid_credentials();
        let b = AppError::invalid_credentials();
        assert_eq!(a.code(), b.code());
        assert_eq!(a.message(), b.message());
    }

    #[test]
    fn db_errors_do_not_leak_detail() {
        let err: AppError =
            DaoLayerError::Db(sea_orm::DbErr::Custom("SELECT secret".to_string())).into();
        assert_eq!(err.code(), "internal");
        assert!(!err.message().contains("SELECT"));
    }

    #[test]
    fn unique_violation_maps_to_duplicate_email() {
        let err: AppError = DaoLayerError::UniqueViolation { entity: "user" }.into();
        assert_eq!(err.code(), "duplicate_email");
    }
}
