use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("{entity} not found ({field}={value})")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("invalid password")]
    InvalidPassword,

    /// The reason is for logs only; callers see a uniform rejection.
    #[error("invalid token provided: {0}")]
    InvalidToken(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("failed to sign token: {0}")]
    Signing(String),

    /// Password hashing or a blocking task failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_lookup() {
        let err = DomainError::not_found("entry", "id", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "entry not found (id=42)");
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let err: DomainError = sea_orm::DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, DomainError::Storage(msg) if msg.contains("connection reset")));
    }
}
